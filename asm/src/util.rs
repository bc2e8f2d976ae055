use crate::{ident::Ident, Program};
use color_print::cformat;

pub fn print_dump(path: &str, program: &Program) {
    println!(
        "{}+------[{}]{}",
        "-".repeat(25),
        path,
        "-".repeat(45usize.saturating_sub(path.len()))
    );
    for (line, stmt, inst) in &program.lines {
        let head = match inst {
            Some((pc, inst)) => format!("[{:04X}] {}", pc, inst.to_bin_str()),
            None => format!("{:24}", ""),
        };
        println!(" {} | {:>4}: {}", head, line.no, stmt.cformat());
    }
    println!("{}+{}", "-".repeat(25), "-".repeat(53));

    for (name, (kind, val)) in program.idents.iter() {
        let kind = match kind {
            Ident::Predefined => continue,
            Ident::Label(_) => cformat!("<g>label</>"),
            Ident::Variable => cformat!("<c>var  </>"),
        };
        println!(" {} 0x{:04X} {}", kind, val, name);
    }
}
