use jackc::{compile, Error};

fn assert(code: &str, expected: &str) {
    let compiled = compile(code).unwrap();
    let text = compiled.to_text();
    for (idx, line) in text.lines().enumerate() {
        println!("{:>3}: {}", idx, line);
    }
    let expected: Vec<&str> = expected
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    assert_eq!(text.lines().collect::<Vec<_>>(), expected);
}

/// Body of `function void main()` with the given locals and statements.
fn main_with(vars: &str, stmts: &str) -> String {
    format!("class Main {{ function void main() {{ {vars} {stmts} return; }} }}")
}

macro_rules! case {
    ($name:ident, $code:expr, $expected:expr) => {
        #[test]
        fn $name() {
            assert(&$code, $expected);
        }
    };
}

case!(
    constructor_allocates_fields_first,
    "class Point {
        field int x, y;
        static int count;
        constructor Point new(int ax, int ay) {
            let x = ax;
            let y = ay;
            let count = count + 1;
            return this;
        }
        method int getX() { return x; }
    }",
    "function Point.new 0
     push constant 2
     call Memory.alloc 1
     pop pointer 0
     push argument 0
     pop this 0
     push argument 1
     pop this 1
     push static 0
     push constant 1
     add
     pop static 0
     push pointer 0
     return
     function Point.getX 0
     push argument 0
     pop pointer 0
     push this 0
     return"
);

case!(
    method_receiver_is_argument_zero,
    "class Box {
        field int w;
        method void grow(int by) { let w = w + by; return; }
    }",
    "function Box.grow 0
     push argument 0
     pop pointer 0
     push this 0
     push argument 1
     add
     pop this 0
     push constant 0
     return"
);

case!(
    while_and_if_labels,
    main_with(
        "var int i;",
        "let i = 0;
         while (i < 10) { let i = i + 1; }
         if (i = 10) { do Output.printInt(i); } else { return; }"
    ),
    "function Main.main 1
     push constant 0
     pop local 0
     label WHILE_EXP0
     push local 0
     push constant 10
     lt
     not
     if-goto WHILE_END1
     push local 0
     push constant 1
     add
     pop local 0
     goto WHILE_EXP0
     label WHILE_END1
     push local 0
     push constant 10
     eq
     if-goto IF_TRUE2
     goto IF_FALSE3
     label IF_TRUE2
     push local 0
     call Output.printInt 1
     pop temp 0
     goto IF_END4
     label IF_FALSE3
     push constant 0
     return
     label IF_END4
     push constant 0
     return"
);

case!(
    if_without_else,
    main_with("", "if (true) { }"),
    "function Main.main 0
     push constant 0
     not
     if-goto IF_TRUE0
     goto IF_FALSE1
     label IF_TRUE0
     label IF_FALSE1
     push constant 0
     return"
);

case!(
    operators_apply_left_to_right,
    main_with("var int x;", "let x = 2 + 3 * 4 / x - 1;"),
    "function Main.main 1
     push constant 2
     push constant 3
     add
     push constant 4
     call Math.multiply 2
     push local 0
     call Math.divide 2
     push constant 1
     sub
     pop local 0
     push constant 0
     return"
);

case!(
    parentheses_group,
    main_with("var int x;", "let x = 2 + (3 * 4);"),
    "function Main.main 1
     push constant 2
     push constant 3
     push constant 4
     call Math.multiply 2
     add
     pop local 0
     push constant 0
     return"
);

case!(
    array_store_and_load,
    main_with("var Array a; var int i, j;", "let a[i] = a[j];"),
    "function Main.main 3
     push local 1
     push local 0
     add
     push local 2
     push local 0
     add
     pop pointer 1
     push that 0
     pop temp 0
     pop pointer 1
     push temp 0
     pop that 0
     push constant 0
     return"
);

case!(
    string_constant,
    main_with("", "do Output.printString(\"Hi\");"),
    "function Main.main 0
     push constant 2
     call String.new 1
     push constant 72
     call String.appendChar 2
     push constant 105
     call String.appendChar 2
     call Output.printString 1
     pop temp 0
     push constant 0
     return"
);

case!(
    keyword_and_unary_terms,
    main_with(
        "var boolean b; var int n;",
        "let b = ~false; let b = null; let n = -n; let b = true;"
    ),
    "function Main.main 2
     push constant 0
     not
     pop local 0
     push constant 0
     pop local 0
     push local 1
     neg
     pop local 1
     push constant 0
     not
     pop local 0
     push constant 0
     return"
);

case!(
    call_resolution,
    "class Main {
        field Point p;
        function void main() {
            var Point q;
            let q = Point.new(1, 2);
            do q.getX();
            do draw(q);
            return;
        }
        method void show() { do p.print(); return; }
        method void draw(Point r) { return; }
    }",
    "function Main.main 1
     push constant 1
     push constant 2
     call Point.new 2
     pop local 0
     push local 0
     call Point.getX 1
     pop temp 0
     push pointer 0
     push local 0
     call Main.draw 2
     pop temp 0
     push constant 0
     return
     function Main.show 0
     push argument 0
     pop pointer 0
     push this 0
     call Point.print 1
     pop temp 0
     push constant 0
     return
     function Main.draw 0
     push argument 0
     pop pointer 0
     push constant 0
     return"
);

case!(
    locals_redefined_per_subroutine,
    "class A {
        function int f(int x) { var int y; let y = x; return y; }
        function int g() { var int z, y; let y = 1; return y; }
    }",
    "function A.f 1
     push argument 0
     pop local 0
     push local 0
     return
     function A.g 2
     push constant 1
     pop local 1
     push local 1
     return"
);

#[test]
fn labels_are_unique() {
    let stmts = "while (x) { if (x) { let x = 1; } else { let x = 2; } } if (x) { while (x) { } }"
        .repeat(3);
    let compiled = compile(&main_with("var int x;", &stmts)).unwrap();
    let labels: Vec<String> = compiled
        .to_text()
        .lines()
        .filter_map(|l| l.strip_prefix("label ").map(str::to_string))
        .collect();
    let mut unique = labels.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(labels.len(), unique.len());
    assert_eq!(labels.len(), 3 * (2 + 3 + 2 + 2));
}

#[test]
fn deterministic() {
    let code = main_with("var int x;", "while (x < 3) { let x = x + 1; }");
    assert_eq!(
        compile(&code).unwrap().to_text(),
        compile(&code).unwrap().to_text()
    );
}

#[test]
fn output_translates() {
    let code = "class Main {
        field int n;
        constructor Main new() { let n = 0; return this; }
        method int step(int k) {
            var Array a;
            let a = Array.new(4);
            let a[k] = n * 2;
            while (~(n > 10)) { let n = n + a[k]; }
            if (n = 11) { return n; } else { return -1; }
        }
    }";
    let compiled = compile(code).unwrap();
    assert_eq!(compiled.class, "Main");
    hackvm::translate(&compiled.class, &compiled.to_text()).unwrap();
}

#[test]
fn undefined_variable() {
    let err = compile(&main_with("", "let y = 1;")).unwrap_err();
    assert!(matches!(err, Error::UndefinedVariable { ref name, .. } if name == "y"));
    let err = compile(&main_with("", "do Output.printInt(z);")).unwrap_err();
    assert!(matches!(err, Error::UndefinedVariable { ref name, .. } if name == "z"));
}

#[test]
fn missing_semicolon() {
    let err = compile("class Main {\n  function void main() {\n    return\n  }\n}").unwrap_err();
    match err {
        Error::UnexpectedToken {
            expected,
            found,
            pos,
        } => {
            assert_eq!(expected, "term");
            assert_eq!(found, "`}`");
            assert_eq!((pos.line, pos.col), (4, 3));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn trailing_input() {
    let err = compile("class A { } class B { }").unwrap_err();
    assert!(matches!(err, Error::TrailingInput { pos } if pos.col == 13));
}

#[test]
fn unexpected_eof() {
    let err = compile("class A {").unwrap_err();
    assert!(matches!(err, Error::UnexpectedEof { .. }));
}

#[test]
fn bad_type() {
    let err = compile("class A { field void x; }").unwrap_err();
    assert!(matches!(err, Error::UnexpectedToken { ref expected, .. } if expected == "type"));
}

#[test]
fn unknown_char() {
    let err = compile(&main_with("var int x;", "let x = 1 $ 2;")).unwrap_err();
    assert!(matches!(err, Error::UnknownChar { ch: '$', .. }));
}
