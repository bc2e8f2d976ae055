use clap::Parser;

use hackemu::{
    hooks::{dump::Dump, Hook},
    Error, State,
};

#[derive(Parser, Debug)]
#[clap(
    name = "Hack Emulator",
    author = "kanade-k-1228",
    version = "v1.0.0",
    about = "Emulator for the Hack 16-bit computer"
)]
struct Args {
    #[arg(short = 't', long)]
    tmax: Option<u64>,

    #[arg(short, long)]
    dump_cfg: Option<String>,

    #[arg(short = 'a', long)]
    dump_all: bool,

    /// RAM cells to print after the run
    #[arg(short, long, value_delimiter = ',')]
    show: Vec<u16>,

    #[arg(default_value = "Prog.hack")]
    input_file: String,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(args) {
        err.print_diag();
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    println!("Hack Emulator");

    println!("+-----------------------------------------------+");
    println!("| {:<45} |", args.input_file);
    println!("+-----------------------------------------------+");

    // ------------------------------------------------------------------------
    // Initialize state machine model
    let mut state = State::new();
    state.load_rom_file(&args.input_file)?;

    // ------------------------------------------------------------------------
    // Initialize hooks
    println!("[INIT]");
    let mut hooks: Vec<Box<dyn Hook>> = vec![Box::new(Dump::arg(args.dump_cfg, args.dump_all)?)];
    state = hooks.iter_mut().fold(state, |state, hook| hook.init(state));

    // ------------------------------------------------------------------------
    // Main loop
    let mut steps = 0;
    for time in 0..args.tmax.unwrap_or(u64::MAX) {
        let (addr, code) = state.exec()?;
        state = hooks
            .iter_mut()
            .fold(state, |state, hook| hook.exec(time, addr, code, state));
        steps = time + 1;
        if state.is_halted() {
            break;
        }
    }

    println!("=================================================");
    println!(
        " {} after {} steps (PC={:04X})",
        if state.is_halted() { "halted" } else { "stopped" },
        steps,
        state.pc()
    );
    for addr in &args.show {
        println!(" RAM[{}] = {}", addr, state.get(*addr) as i16);
    }
    Ok(())
}
