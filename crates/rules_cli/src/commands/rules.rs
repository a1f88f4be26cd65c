use anyhow::Result;

pub fn execute() -> Result<()> {
    let env = super::environment();

    println!("Registered rules:");
    for name in env.registry().names() {
        println!("  {}", name);
    }

    Ok(())
}
