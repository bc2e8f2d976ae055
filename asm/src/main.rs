use color_print::cprintln;
use hackasm::{util::print_dump, Error};
use std::path::Path;

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
    /// Input file
    #[clap(default_value = "Prog.asm")]
    input: String,

    /// Output file [default: input with `.hack` extension]
    #[clap(short, long)]
    output: Option<String>,

    /// Dump assembly listing and symbols
    #[clap(short, long)]
    dump: bool,
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();
    println!("Hack Assembler");

    println!("1. Read File");
    println!("  < {}", args.input);
    let source = match std::fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(err) => fail(&Error::FileOpen(args.input.clone(), err), &args.input, ""),
    };

    println!("2. Resolve Labels & Generate Binary");
    let program = match hackasm::assemble(&source) {
        Ok(program) => program,
        Err(err) => fail(&err, &args.input, &source),
    };

    let output = args.output.clone().unwrap_or_else(|| {
        Path::new(&args.input)
            .with_extension("hack")
            .to_string_lossy()
            .into_owned()
    });
    println!("  > {}", output);
    if let Err(err) = std::fs::write(&output, program.to_text()) {
        fail(&Error::FileCreate(output.clone(), err), &args.input, &source);
    }

    if args.dump {
        print_dump(&args.input, &program);
    }
}

fn fail(err: &Error, file: &str, source: &str) -> ! {
    err.print_diag(file, source);
    cprintln!("<red,bold>aborted</>: no output written");
    std::process::exit(1);
}
