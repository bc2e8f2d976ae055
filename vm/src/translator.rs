use std::collections::HashMap;

use arch::{
    reg::{Reg, R13, R14, STACK_BASE, TEMP_BASE},
    vm::{Arith, Command, Segment},
};
use itertools::{chain, Itertools};

use crate::{
    error::Error,
    parser::{parse, Line},
};

/// Entry routine the bootstrap jumps to.
pub const ENTRY: &str = "Sys.init";

macro_rules! asm {
    ($($line:expr),* $(,)?) => {
        vec![$($line.to_string()),*]
    };
}

/// Translation run. Owns the label counters, so every run starts fresh
/// and generated labels never collide within one run.
#[derive(Debug, Default)]
pub struct Translator {
    label_id: usize,
    call_id: usize,
    out: Vec<String>,
}

/// Per-unit state: static prefix, enclosing function and stack depth.
struct Unit<'a> {
    name: &'a str,
    function: Option<String>,
    /// `None` once control cannot fall through (after `goto`/`return`).
    depth: Option<usize>,
    /// Deepest stack seen at a forward jump, per target label.
    jumps: HashMap<String, usize>,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `SP = 256; goto Sys.init`. Emit once, before any unit.
    pub fn bootstrap(&mut self) {
        self.out.extend(asm![
            format!("@{}", STACK_BASE),
            "D=A",
            "@SP",
            "M=D",
            format!("@{}", ENTRY),
            "0;JMP",
        ]);
    }

    /// Translate one unit. Nothing is appended on failure.
    pub fn translate(&mut self, unit: &str, source: &str) -> Result<(), Error> {
        let lines = parse(source)?;
        let mut ctx = Unit {
            name: unit,
            function: None,
            depth: Some(0),
            jumps: HashMap::new(),
        };
        let mut out = Vec::new();
        for line in &lines {
            ctx.check(line)?;
            out.extend(self.lower(&mut ctx, &line.cmd));
        }
        self.out.extend(out);
        Ok(())
    }

    pub fn lines(&self) -> &[String] {
        &self.out
    }

    pub fn finish(self) -> String {
        let mut text = self.out.iter().join("\n");
        text.push('\n');
        text
    }
}

/// Translate a single unit without bootstrap.
pub fn translate(unit: &str, source: &str) -> Result<String, Error> {
    let mut translator = Translator::new();
    translator.translate(unit, source)?;
    Ok(translator.finish())
}

// ----------------------------------------------------------------------------
// Stack depth

impl Unit<'_> {
    fn check(&mut self, line: &Line) -> Result<(), Error> {
        let (need, push) = match &line.cmd {
            Command::Push(..) => (0, 1),
            Command::Pop(..) | Command::IfGoto(_) => (1, 0),
            Command::Arith(op) => (op.arity(), 1),
            Command::Goto(_) => (0, 0),
            Command::Call(_, n) => (*n as usize, 1),
            Command::Function(..) => {
                self.depth = Some(0);
                self.jumps.clear();
                return Ok(());
            }
            Command::Label(label) => {
                self.depth = self.depth.max(self.jumps.get(label).copied());
                return Ok(());
            }
            Command::Return => (1, 0),
        };
        let Some(depth) = self.depth else {
            return Ok(());
        };
        if depth < need {
            return Err(Error::StackUnderflow {
                line: line.no,
                text: line.text.clone(),
                need,
                have: depth,
            });
        }
        let depth = depth - need + push;
        self.depth = match &line.cmd {
            Command::Goto(label) | Command::IfGoto(label) => {
                let seen = self.jumps.entry(label.clone()).or_insert(depth);
                *seen = (*seen).max(depth);
                matches!(line.cmd, Command::IfGoto(_)).then_some(depth)
            }
            Command::Return => None,
            _ => Some(depth),
        };
        Ok(())
    }

    /// Labels live in the namespace of the enclosing function, or of the
    /// unit outside any function. Generated labels never contain `$`.
    fn scoped(&self, label: &str) -> String {
        match &self.function {
            Some(function) => format!("{function}${label}"),
            None => format!("{}${label}", self.name),
        }
    }
}

// ----------------------------------------------------------------------------
// Lowering

impl Translator {
    fn lower(&mut self, unit: &mut Unit, cmd: &Command) -> Vec<String> {
        match cmd {
            Command::Push(seg, idx) => push(unit, *seg, *idx),
            Command::Pop(seg, idx) => pop(unit, *seg, *idx),
            Command::Arith(op) => self.arith(*op),
            Command::Label(label) => asm![format!("({})", unit.scoped(label))],
            Command::Goto(label) => asm![format!("@{}", unit.scoped(label)), "0;JMP"],
            Command::IfGoto(label) => chain!(
                pop_d(),
                asm![format!("@{}", unit.scoped(label)), "D;JNE"]
            )
            .collect(),
            Command::Function(name, n_locals) => {
                unit.function = Some(name.clone());
                let mut out = asm![format!("({})", name)];
                for _ in 0..*n_locals {
                    out.extend(asm!["@SP", "A=M", "M=0", "@SP", "M=M+1"]);
                }
                out
            }
            Command::Call(name, n_args) => self.call(name, *n_args),
            Command::Return => ret(),
        }
    }

    fn arith(&mut self, op: Arith) -> Vec<String> {
        match op {
            Arith::Add => binary("M=D+M"),
            Arith::Sub => binary("M=M-D"),
            Arith::And => binary("M=D&M"),
            Arith::Or => binary("M=D|M"),
            Arith::Neg => asm!["@SP", "A=M-1", "M=-M"],
            Arith::Not => asm!["@SP", "A=M-1", "M=!M"],
            Arith::Eq => self.compare("JEQ"),
            Arith::Gt => self.compare("JGT"),
            Arith::Lt => self.compare("JLT"),
        }
    }

    /// `left - right` tested against zero; pushes -1 (true) or 0 (false).
    fn compare(&mut self, jump: &str) -> Vec<String> {
        let id = self.label_id;
        self.label_id += 1;
        let (t, end) = (format!("TRUE_{id}"), format!("END_{id}"));
        chain!(
            pop_d(),
            asm![
                "@SP",
                "AM=M-1",
                "D=M-D",
                "@SP",
                "A=M",
                "M=0",
                format!("@{t}"),
                format!("D;{jump}"),
                format!("@{end}"),
                "0;JMP",
                format!("({t})"),
                "@SP",
                "A=M",
                "M=-1",
                format!("({end})"),
                "@SP",
                "M=M+1",
            ]
        )
        .collect()
    }

    fn call(&mut self, name: &str, n_args: u16) -> Vec<String> {
        let ret = format!("RETURN_LABEL_{}", self.call_id);
        self.call_id += 1;

        let mut out = chain!(asm![format!("@{ret}"), "D=A"], push_d()).collect::<Vec<_>>();
        for reg in [Reg::LCL, Reg::ARG, Reg::THIS, Reg::THAT] {
            out.extend(asm![format!("@{reg}"), "D=M"]);
            out.extend(push_d());
        }
        out.extend(asm![
            // ARG = SP - nArgs - 5
            "@SP",
            "D=M",
            format!("@{n_args}"),
            "D=D-A",
            "@5",
            "D=D-A",
            "@ARG",
            "M=D",
            // LCL = SP
            "@SP",
            "D=M",
            "@LCL",
            "M=D",
            format!("@{name}"),
            "0;JMP",
            format!("({ret})"),
        ]);
        out
    }
}

fn ret() -> Vec<String> {
    let frame = format!("@R{R13}");
    let addr = format!("@R{R14}");
    let mut out = asm![
        // FRAME = LCL
        "@LCL",
        "D=M",
        frame,
        "M=D",
        // RET = *(FRAME - 5)
        "@5",
        "A=D-A",
        "D=M",
        addr,
        "M=D",
    ];
    // *ARG = pop()
    out.extend(pop_d());
    out.extend(asm![
        "@ARG",
        "A=M",
        "M=D",
        // SP = ARG + 1
        "@ARG",
        "D=M+1",
        "@SP",
        "M=D",
    ]);
    // THAT, THIS, ARG, LCL = *(--FRAME)
    for reg in [Reg::THAT, Reg::THIS, Reg::ARG, Reg::LCL] {
        out.extend(asm![frame, "AM=M-1", "D=M", format!("@{reg}"), "M=D"]);
    }
    out.extend(asm![addr, "A=M", "0;JMP"]);
    out
}

fn push(unit: &Unit, seg: Segment, idx: u16) -> Vec<String> {
    let load = match seg {
        Segment::Constant => asm![format!("@{idx}"), "D=A"],
        Segment::Local | Segment::Argument | Segment::This | Segment::That => asm![
            format!("@{idx}"),
            "D=A",
            format!("@{}", base(seg)),
            "A=D+M",
            "D=M",
        ],
        Segment::Temp | Segment::Pointer | Segment::Static => {
            asm![format!("@{}", direct(unit, seg, idx)), "D=M"]
        }
    };
    chain!(load, push_d()).collect()
}

fn pop(unit: &Unit, seg: Segment, idx: u16) -> Vec<String> {
    match seg {
        Segment::Local | Segment::Argument | Segment::This | Segment::That => chain!(
            asm![
                format!("@{idx}"),
                "D=A",
                format!("@{}", base(seg)),
                "D=D+M",
                format!("@R{R13}"),
                "M=D",
            ],
            pop_d(),
            asm![format!("@R{R13}"), "A=M", "M=D"]
        )
        .collect(),
        // Constant is rejected by the parser.
        _ => chain!(
            pop_d(),
            asm![format!("@{}", direct(unit, seg, idx)), "M=D"]
        )
        .collect(),
    }
}

fn base(seg: Segment) -> Reg {
    match seg {
        Segment::Local => Reg::LCL,
        Segment::Argument => Reg::ARG,
        Segment::This => Reg::THIS,
        _ => Reg::THAT,
    }
}

/// Symbol or address of a directly addressed cell.
fn direct(unit: &Unit, seg: Segment, idx: u16) -> String {
    match seg {
        Segment::Temp => (TEMP_BASE + idx).to_string(),
        Segment::Pointer if idx == 0 => Reg::THIS.to_string(),
        Segment::Pointer => Reg::THAT.to_string(),
        _ => format!("{}.{}", unit.name, idx),
    }
}

fn push_d() -> Vec<String> {
    asm!["@SP", "A=M", "M=D", "@SP", "M=M+1"]
}

fn pop_d() -> Vec<String> {
    asm!["@SP", "AM=M-1", "D=M"]
}

fn binary(combine: &str) -> Vec<String> {
    chain!(pop_d(), asm!["@SP", "AM=M-1", combine, "@SP", "M=M+1"]).collect()
}
