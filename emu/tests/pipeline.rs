//! Jack source through every stage down to execution.

use hackemu::State;
use hackvm::Translator;

const MEMORY: &str = "
class Memory {
    static int free;

    function int alloc(int size) {
        var int block;
        if (free = 0) { let free = 2048; }
        let block = free;
        let free = free + size;
        return block;
    }
}";

const MATH: &str = "
class Math {
    /** Repeated addition, non-negative y only. */
    function int multiply(int x, int y) {
        var int sum;
        while (y > 0) {
            let sum = sum + x;
            let y = y - 1;
        }
        return sum;
    }
}";

const POINT: &str = "
class Point {
    field int x, y;

    constructor Point new(int ax, int ay) {
        let x = ax;
        let y = ay;
        return this;
    }

    method int getX() { return x; }
    method int getY() { return y; }

    method int dot(Point o) {
        return (x * o.getX()) + (y * o.getY());
    }
}";

const SYS: &str = "
function Sys.init 0
call Main.main 0
pop temp 0
label HALT
goto HALT
";

/// Compile, translate with bootstrap, assemble and run.
fn run(classes: &[&str]) -> (State, hackasm::Program) {
    let mut translator = Translator::new();
    translator.bootstrap();
    for source in classes {
        let compiled = jackc::compile(source).unwrap();
        translator
            .translate(&compiled.class, &compiled.to_text())
            .unwrap();
    }
    translator.translate("Sys", SYS).unwrap();

    let program = hackasm::assemble(&translator.finish()).unwrap();
    let mut state = State::new();
    state.load_hack_text(&program.to_text()).unwrap();
    state.run(2_000_000).unwrap();
    assert!(state.is_halted());
    (state, program)
}

fn result(state: &State, program: &hackasm::Program) -> i16 {
    let addr = program.idents.get_val("Main.0").unwrap();
    state.get(addr) as i16
}

#[test]
fn objects_arrays_and_calls() {
    let main = "
    class Main {
        static int result;

        function void main() {
            var Point p, q;
            var Array a;
            var int i;
            let p = Point.new(3, 4);
            let q = Point.new(5, 6);
            let a = Memory.alloc(5);
            let i = 0;
            while (i < 5) {
                let a[i] = i * i;
                let i = i + 1;
            }
            let result = p.dot(q) + a[4];
            return;
        }
    }";
    let (state, program) = run(&[main, POINT, MATH, MEMORY]);
    assert_eq!(result(&state, &program), 55);
    assert_eq!(state.get(arch::reg::Reg::SP), 256);
}

#[test]
fn branches_and_negatives() {
    let main = "
    class Main {
        static int result;

        function int sign(int n) {
            if (n < 0) { return -1; }
            if (n = 0) { return 0; }
            return 1;
        }

        function void main() {
            let result = (Main.sign(-7) * 100) + (Main.sign(0) * 10) + Main.sign(9);
            return;
        }
    }";
    let (state, program) = run(&[main, MATH]);
    assert_eq!(result(&state, &program), -99);
}

#[test]
fn recursion_through_methods() {
    let main = "
    class Main {
        static int result;
        field int base;

        constructor Main new(int b) { let base = b; return this; }

        method int fact(int n) {
            if (n < 2) { return base; }
            return fact(n - 1) * n;
        }

        function void main() {
            var Main m;
            let m = Main.new(1);
            let result = m.fact(6);
            return;
        }
    }";
    let (state, program) = run(&[main, MATH, MEMORY]);
    assert_eq!(result(&state, &program), 720);
}
