use clap::CommandFactory;
use std::fs;

include!("src/cli.rs");

fn main() -> std::io::Result<()> {
    let out_dir = std::path::PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("../../../man");

    fs::create_dir_all(&man_dir)?;

    for (name, cmd) in [
        ("pipeline_build_matrix", BuildMatrixArgs::command()),
        ("pipeline_apsp", ApspArgs::command()),
        ("pipeline_pam", PamArgs::command()),
    ] {
        let man = clap_mangen::Man::new(cmd);
        let mut buffer = Vec::new();
        man.render(&mut buffer)?;
        fs::write(man_dir.join(format!("{}.1", name)), buffer)?;
    }

    Ok(())
}
