pub mod error;
pub mod hooks;
pub mod model;

pub use error::Error;
pub use model::State;

/// Load assembled words, run until halted or `limit` steps, return the final state.
pub fn run_words(words: &[u16], limit: u64) -> Result<State, Error> {
    let mut state = State::new();
    state.load_words(words)?;
    state.run(limit)?;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch::reg::Reg;

    fn words(src: &str) -> Vec<u16> {
        hackasm::assemble(src).unwrap().words()
    }

    #[test]
    fn a_and_d() {
        let cpu = run_words(&words("@7\nD=A\n@3\nD=D+A\n(END)\n@END\n0;JMP\n"), 100).unwrap();
        assert_eq!(cpu.d(), 10);
        assert!(cpu.is_halted());
    }

    #[test]
    fn memory_write() {
        let cpu = run_words(&words("@42\nD=A\n@100\nM=D\nM=M+1\n(END)\n@END\n0;JMP\n"), 100).unwrap();
        assert_eq!(cpu.get(100u16), 43);
    }

    #[test]
    fn conditional_jump() {
        let src = "\
@5
D=A
@NEG
D;JLT
@1
D=A
@R0
M=D
(END)
@END
0;JMP
(NEG)
@R0
M=-1
";
        let cpu = run_words(&words(src), 100).unwrap();
        assert_eq!(cpu.get(Reg::SP), 1);
    }

    #[test]
    fn countdown_loop() {
        let src = "\
@3
D=A
@i
M=D
(LOOP)
@i
MD=M-1
@LOOP
D;JGT
(END)
@END
0;JMP
";
        let cpu = run_words(&words(src), 1000).unwrap();
        assert_eq!(cpu.get(16u16), 0);
        assert!(cpu.is_halted());
    }

    #[test]
    fn limit_stops_busy_loop() {
        let src = "(LOOP)\n@i\nM=M+1\n@LOOP\n0;JMP\n";
        let mut cpu = State::new();
        cpu.load_words(&words(src)).unwrap();
        assert_eq!(cpu.run(40).unwrap(), 40);
        assert!(!cpu.is_halted());
        assert_eq!(cpu.get(16u16), 10);
    }

    #[test]
    fn load_hack_text() {
        let mut cpu = State::new();
        cpu.load_hack_text("0000000000000111\n1110110000010000\n\n").unwrap();
        cpu.run(2).unwrap();
        assert_eq!(cpu.d(), 7);
    }

    #[test]
    fn reject_bad_word() {
        let mut cpu = State::new();
        let err = cpu.load_hack_text("0000000000000111\n0101\n").unwrap_err();
        assert!(matches!(err, Error::InvalidWord { line: 2, .. }));
        let err = cpu.load_hack_text("000000000000011x\n").unwrap_err();
        assert!(matches!(err, Error::InvalidWord { line: 1, .. }));
    }

    #[test]
    fn undefined_word() {
        // comp code 0000001 is unassigned
        let mut cpu = State::new();
        cpu.load_words(&[0b1110_0000_0100_0000]).unwrap();
        assert!(matches!(cpu.exec(), Err(Error::Decode { pc: 0, .. })));
    }
}
