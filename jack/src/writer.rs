use arch::vm::{Arith, Command, Segment};

/// Collects stack-machine commands in emission order.
#[derive(Debug, Default)]
pub struct VmWriter {
    code: Vec<Command>,
}

impl VmWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, seg: Segment, idx: u16) {
        self.code.push(Command::Push(seg, idx));
    }

    pub fn pop(&mut self, seg: Segment, idx: u16) {
        self.code.push(Command::Pop(seg, idx));
    }

    pub fn arith(&mut self, op: Arith) {
        self.code.push(Command::Arith(op));
    }

    pub fn label(&mut self, name: &str) {
        self.code.push(Command::Label(name.to_string()));
    }

    pub fn goto(&mut self, name: &str) {
        self.code.push(Command::Goto(name.to_string()));
    }

    pub fn if_goto(&mut self, name: &str) {
        self.code.push(Command::IfGoto(name.to_string()));
    }

    pub fn call(&mut self, name: &str, n_args: u16) {
        self.code.push(Command::Call(name.to_string(), n_args));
    }

    pub fn function(&mut self, name: &str, n_locals: u16) {
        self.code.push(Command::Function(name.to_string(), n_locals));
    }

    pub fn ret(&mut self) {
        self.code.push(Command::Return);
    }

    pub fn commands(&self) -> &[Command] {
        &self.code
    }

    pub fn into_commands(self) -> Vec<Command> {
        self.code
    }
}

/// One command per line, newline terminated.
pub fn to_text(code: &[Command]) -> String {
    code.iter().map(|cmd| format!("{cmd}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_protocol() {
        let mut vm = VmWriter::new();
        vm.function("Main.main", 1);
        vm.push(Segment::Constant, 0);
        vm.pop(Segment::Local, 0);
        vm.label("WHILE_EXP0");
        vm.arith(Arith::Not);
        vm.if_goto("WHILE_END1");
        vm.goto("WHILE_EXP0");
        vm.call("Math.multiply", 2);
        vm.ret();
        assert_eq!(
            to_text(vm.commands()),
            "function Main.main 1\npush constant 0\npop local 0\nlabel WHILE_EXP0\nnot\n\
             if-goto WHILE_END1\ngoto WHILE_EXP0\ncall Math.multiply 2\nreturn\n"
        );
    }

    #[test]
    fn text_is_parseable() {
        let mut vm = VmWriter::new();
        vm.push(Segment::That, 0);
        vm.arith(Arith::Lt);
        for (line, cmd) in to_text(vm.commands()).lines().zip(vm.commands()) {
            assert_eq!(&Command::parse(line).unwrap(), cmd);
        }
    }
}
