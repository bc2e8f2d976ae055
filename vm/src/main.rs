use color_print::cprintln;
use hackvm::{Error, Translator};
use std::path::{Path, PathBuf};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input `.vm` file or directory of `.vm` files
    #[clap(default_value = ".")]
    input: String,

    /// Output file [default: `<file>.asm` or `<dir>/<dir>.asm`]
    #[clap(short, long)]
    output: Option<String>,

    /// Prepend the bootstrap code (default for directories)
    #[clap(long, conflicts_with = "no_bootstrap")]
    bootstrap: bool,

    /// Never prepend the bootstrap code
    #[clap(long)]
    no_bootstrap: bool,
}

fn main() {
    use clap::Parser;

    let args = Args::parse();
    println!("VM Translator");

    let input = Path::new(&args.input);
    let (units, default_out, linked) = if input.is_dir() {
        let name = input
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "out".to_string());
        let units = match collect(input) {
            Ok(units) => units,
            Err(err) => fail(&err, &args.input, ""),
        };
        (units, input.join(format!("{name}.asm")), true)
    } else {
        (vec![input.to_path_buf()], input.with_extension("asm"), false)
    };

    let mut translator = Translator::new();
    if (linked || args.bootstrap) && !args.no_bootstrap {
        println!("0. Bootstrap -> {}", hackvm::ENTRY);
        translator.bootstrap();
    }

    println!("1. Translate Units");
    for path in &units {
        let file = path.to_string_lossy().into_owned();
        println!("  < {}", file);
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => fail(&Error::FileOpen(file.clone(), err), &file, ""),
        };
        let unit = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if let Err(err) = translator.translate(&unit, &source) {
            fail(&err, &file, &source);
        }
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_out.to_string_lossy().into_owned());
    println!("2. Write Assembly");
    println!("  > {}", output);
    if let Err(err) = std::fs::write(&output, translator.finish()) {
        fail(&Error::FileCreate(output.clone(), err), &output, "");
    }
}

/// `.vm` files of a directory, sorted by name.
fn collect(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let entries = std::fs::read_dir(dir)
        .map_err(|err| Error::FileOpen(dir.to_string_lossy().into_owned(), err))?;
    let mut units: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "vm"))
        .collect();
    units.sort();
    if units.is_empty() {
        return Err(Error::NoInput(dir.to_string_lossy().into_owned()));
    }
    Ok(units)
}

fn fail(err: &Error, file: &str, source: &str) -> ! {
    err.print_diag(file, source);
    cprintln!("<red,bold>aborted</>: no output written");
    std::process::exit(1);
}
