use anyhow::Result;
use trachoma::runner::run_with_args;

fn main() -> Result<()> {
    let summary = run_with_args()?;
    for path in &summary.files {
        println!("{}", path.display());
    }
    Ok(())
}
