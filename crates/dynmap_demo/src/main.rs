use anyhow::Result;
use std::path::PathBuf;

fn main() -> Result<()> {
    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = dynmap_demo::load_config(path.as_deref())?;
    for report in dynmap_demo::run(&config) {
        println!("{report}");
    }
    Ok(())
}
