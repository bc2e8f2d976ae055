use color_print::cprintln;
use jackc::Error;
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
    /// Input `.jack` file or directory of `.jack` files
    #[clap(default_value = ".")]
    input: String,

    /// Print generated code
    #[clap(short, long)]
    verbose: bool,
}

fn main() {
    use clap::Parser;

    let args = Args::parse();
    println!("Jack Compiler");

    println!("1. Collect Sources");
    let input = Path::new(&args.input);
    let units = if input.is_dir() {
        match collect(input) {
            Ok(units) => units,
            Err(err) => fail(&err, &args.input, ""),
        }
    } else {
        vec![input.to_path_buf()]
    };

    println!("2. Compile Classes");
    for path in &units {
        let file = path.to_string_lossy().into_owned();
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => fail(&Error::FileOpen(file.clone(), err), &file, ""),
        };
        let compiled = match jackc::compile(&source) {
            Ok(compiled) => compiled,
            Err(err) => fail(&err, &file, &source),
        };

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if compiled.class != stem {
            cprintln!(
                "<yellow,bold>warning</>: class `{}` is defined in `{}`; statics are named after the file",
                compiled.class,
                file
            );
        }

        let output = path.with_extension("vm");
        let text = compiled.to_text();
        println!("  {} > {}", file, output.display());
        if args.verbose {
            print!("{}", text);
        }
        if let Err(err) = std::fs::write(&output, text) {
            let output = output.to_string_lossy().into_owned();
            fail(&Error::FileCreate(output.clone(), err), &output, "");
        }
    }
}

/// `.jack` files of a directory, sorted by name.
fn collect(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let entries = std::fs::read_dir(dir)
        .map_err(|err| Error::FileOpen(dir.to_string_lossy().into_owned(), err))?;
    let mut units: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "jack"))
        .collect();
    units.sort();
    if units.is_empty() {
        return Err(Error::NoInput(dir.to_string_lossy().into_owned()));
    }
    Ok(units)
}

fn fail(err: &Error, file: &str, source: &str) -> ! {
    err.print_diag(file, source);
    cprintln!("<red,bold>aborted</>: no output written for {}", file);
    std::process::exit(1);
}
