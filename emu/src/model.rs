use arch::{
    alu::valu,
    inst::{Dest, Inst},
    reg::{MAX_ADDR, RAM_SIZE, ROM_SIZE},
};

use crate::error::Error;

pub struct State {
    rom: Vec<u16>,
    ram: Vec<u16>,
    a: u16,
    d: u16,
    pc: u16,
    halted: bool,
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

// Memory access
impl State {
    pub fn get(&self, addr: impl Into<u16>) -> u16 {
        self.ram[(addr.into() & MAX_ADDR) as usize]
    }

    pub fn set(&mut self, addr: impl Into<u16>, val: u16) {
        self.ram[(addr.into() & MAX_ADDR) as usize] = val;
    }

    pub fn a(&self) -> u16 {
        self.a
    }

    pub fn d(&self) -> u16 {
        self.d
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Value on top of the stack.
    pub fn top(&self) -> u16 {
        let sp = self.get(arch::reg::Reg::SP);
        self.get(sp.wrapping_sub(1))
    }
}

impl State {
    pub fn new() -> Self {
        State {
            rom: vec![0; ROM_SIZE],
            ram: vec![0; RAM_SIZE],
            a: 0,
            d: 0,
            pc: 0,
            halted: false,
        }
    }

    /// Set when the program reached a loop that can never change the state.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn load_words(&mut self, words: &[u16]) -> Result<(), Error> {
        if words.len() > ROM_SIZE {
            return Err(Error::RomTooLarge(words.len()));
        }
        self.rom.fill(0);
        self.rom[..words.len()].copy_from_slice(words);
        Ok(())
    }

    /// Load `.hack` text: one 16-character binary word per line.
    pub fn load_hack_text(&mut self, text: &str) -> Result<(), Error> {
        let mut words = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let invalid = || Error::InvalidWord {
                line: idx + 1,
                text: line.to_string(),
            };
            if line.len() != 16 {
                return Err(invalid());
            }
            words.push(u16::from_str_radix(line, 2).map_err(|_| invalid())?);
        }
        self.load_words(&words)
    }

    pub fn load_rom_file(&mut self, fname: &str) -> Result<(), Error> {
        let text =
            std::fs::read_to_string(fname).map_err(|e| Error::FileOpen(fname.to_string(), e))?;
        self.load_hack_text(&text)
    }

    /// Execute one instruction. Returns its address and machine word.
    pub fn exec(&mut self) -> Result<(u16, u16), Error> {
        let pc = self.pc;
        let word = self.rom[(pc & MAX_ADDR) as usize];
        let inst = Inst::from_bin(word).map_err(|source| Error::Decode { pc, word, source })?;

        match inst {
            Inst::A(value) => {
                self.a = value;
                self.pc = pc.wrapping_add(1);
            }
            Inst::C(dest, comp, jump) => {
                let addr = self.a;
                let out = valu(comp, self.d, addr, self.get(addr));
                if dest.m() {
                    self.set(addr, out);
                }
                if dest.a() {
                    self.a = out;
                }
                if dest.d() {
                    self.d = out;
                }
                if jump.taken(out) {
                    self.pc = addr;
                    self.halted = dest == Dest::Null && self.is_idle_loop(pc, addr);
                } else {
                    self.pc = pc.wrapping_add(1);
                }
            }
        }
        Ok((pc, word))
    }

    /// A jump back onto itself, or onto the `@target` that loads its own address.
    fn is_idle_loop(&self, pc: u16, target: u16) -> bool {
        target == pc
            || (target.wrapping_add(1) == pc
                && Inst::from_bin(self.rom[(target & MAX_ADDR) as usize]) == Ok(Inst::A(target)))
    }

    /// Run until halted or `limit` instructions were executed.
    /// Returns the number of executed instructions.
    pub fn run(&mut self, limit: u64) -> Result<u64, Error> {
        for time in 0..limit {
            if self.halted {
                return Ok(time);
            }
            self.exec()?;
        }
        Ok(limit)
    }
}
