use arch::{
    inst::Inst,
    reg::{Reg, STACK_BASE},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use strum::IntoEnumIterator;

use crate::{error::Error, model::State};

use super::Hook;

/// Prints registers and selected RAM cells when the PC reaches configured addresses.
///
/// ```yaml
/// 12:
///   stack: true
///   ram: [16, 17]
/// ```
#[derive(Debug)]
pub struct Dump {
    file: Option<String>,
    all: bool,
    list: List,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct List(pub HashMap<u16, Config>);

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub stack: bool,
    #[serde(default)]
    pub ram: Vec<u16>,
}

impl Dump {
    pub fn new(list: List, all: bool) -> Self {
        Self {
            file: None,
            all,
            list,
        }
    }

    pub fn arg(file: Option<String>, all: bool) -> Result<Self, Error> {
        let Some(fname) = file else {
            return Ok(Self::new(List::default(), all));
        };
        let reader = File::open(&fname).map_err(|e| Error::FileOpen(fname.clone(), e))?;
        let list: List = serde_yaml::from_reader(BufReader::new(reader))
            .map_err(|e| Error::Config(fname.clone(), e))?;
        Ok(Self {
            file: Some(fname),
            all,
            list,
        })
    }

    fn get(&self, pc: u16) -> Option<&Config> {
        self.list.0.get(&pc)
    }
}

impl Hook for Dump {
    fn init(&mut self, state: State) -> State {
        if self.all {
            println!(" * Dump all");
        }
        if let Some(fname) = &self.file {
            println!(" * Dump[{}] {:?}", self.list.0.len(), fname);
        }
        state
    }

    fn exec(&mut self, time: u64, addr: u16, code: u16, cpu: State) -> State {
        if let Some(cfg) = self.get(addr) {
            print_inst(time, addr, code);
            print_reg(&cpu);
            if cfg.stack {
                print_stack(&cpu);
            }
            print_ram(&cpu, &cfg.ram);
        } else if self.all {
            print_inst(time, addr, code);
            print_reg(&cpu);
        }
        cpu
    }
}

fn print_inst(time: u64, addr: u16, code: u16) {
    match Inst::from_bin(code) {
        Ok(inst) => println!("[{:0>6}] {:04X}: {}", time, addr, inst.cformat()),
        Err(_) => println!("[{:0>6}] {:04X}: {:016b}", time, addr, code),
    }
}

fn print_reg(cpu: &State) {
    println!(" +-----------+-----------+-----------+");
    println!(
        " | A: {:0>4X}  | D: {:0>4X}  | PC: {:0>4X} |",
        cpu.a(),
        cpu.d(),
        cpu.pc()
    );
    let regs: Vec<String> = Reg::iter()
        .map(|reg| format!("{}: {:0>4X}", reg, cpu.get(reg)))
        .collect();
    println!(" | {} |", regs.join(" "));
    println!(" +-----------------------------------+");
}

fn print_stack(cpu: &State) {
    for addr in STACK_BASE..cpu.get(Reg::SP) {
        println!(" | {:0>4X} : {:0>4X}", addr, cpu.get(addr));
    }
    println!(" +-----------------------------------+");
}

fn print_ram(cpu: &State, addrs: &[u16]) {
    for addr in addrs {
        println!(" | {:0>4X} : {:0>4X}", addr, cpu.get(*addr));
    }
    if !addrs.is_empty() {
        println!(" +-----------------------------------+");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_config() {
        let yaml = "12:\n  stack: true\n  ram: [16, 17]\n40:\n  ram: [256]\n";
        let list: List = serde_yaml::from_str(yaml).unwrap();
        let cfg = &list.0[&12];
        assert!(cfg.stack);
        assert_eq!(cfg.ram, vec![16, 17]);
        assert!(!list.0[&40].stack);
    }

    #[test]
    fn hook_returns_state_untouched() {
        let mut list = List::default();
        list.0.insert(
            0,
            Config {
                stack: true,
                ram: vec![0],
            },
        );
        let mut dump = Dump::new(list, false);
        let mut cpu = State::new();
        cpu.set(Reg::SP, 258);
        cpu.set(256u16, 7);
        let cpu = dump.exec(0, 0, 0, cpu);
        assert_eq!(cpu.get(Reg::SP), 258);
        assert_eq!(cpu.get(256u16), 7);
    }
}
