use huffman_text::file::default_output;
use huffman_text::{decode_file, encode_file, Options, Strategy};
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn run(input: &Path) -> huffman_text::Result<()> {
    // encode - save next to the input
    let stats = encode_file(input, None, &Options::default())?;
    println!("{stats}");

    // decode - read it back with both strategies
    let packed = default_output(input);
    for strategy in [Strategy::Table, Strategy::Tree] {
        let mut name = packed.clone().into_os_string();
        name.push(format!(".{strategy:?}.txt").to_lowercase());
        let restored = PathBuf::from(name);

        decode_file(&packed, &restored, strategy)?;
        println!("decoded with {strategy:?} into {}", restored.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    let Some(fp) = env::args().nth(1) else {
        eprintln!("Please provide path to input file as first argument.");
        return ExitCode::FAILURE;
    };

    match run(Path::new(&fp)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{fp}: {e}");
            ExitCode::FAILURE
        }
    }
}
