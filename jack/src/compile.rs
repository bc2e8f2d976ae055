//! Single-pass code generation: every grammar rule emits its commands
//! while it parses, no syntax tree is built.

use arch::vm::{Arith, Command, Segment};

use crate::error::Error;
use crate::grammar::{
    parsercore::Parser,
    token::{Keyword as K, Pos, Token, TokenKind as T},
};
use crate::symbols::{Kind, SymbolTable};
use crate::writer::{self, VmWriter};
use crate::{check, expect, optional};

/// Compiled class: name and its commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiled {
    pub class: String,
    pub code: Vec<Command>,
}

impl Compiled {
    pub fn to_text(&self) -> String {
        writer::to_text(&self.code)
    }
}

pub struct Engine {
    parser: Parser,
    symbols: SymbolTable,
    vm: VmWriter,
    class_name: String,
    label_id: usize,
}

impl Engine {
    pub fn new(tokens: Vec<Token>) -> Self {
        Engine {
            parser: Parser::new(tokens),
            symbols: SymbolTable::new(),
            vm: VmWriter::new(),
            class_name: String::new(),
            label_id: 0,
        }
    }

    pub fn compile(mut self) -> Result<Compiled, Error> {
        self.compile_class()?;
        Ok(Compiled {
            class: self.class_name,
            code: self.vm.into_commands(),
        })
    }
}

// ----------------------------------------------------------------------------
// Helpers

impl Engine {
    fn eat_symbol(&mut self, ch: char) -> Result<Token, Error> {
        self.parser
            .expect_tobe(&format!("`{ch}`"), |token| token.kind == T::Symbol(ch))
    }

    fn eat_keyword(&mut self, kw: K) -> Result<Token, Error> {
        self.parser
            .expect_tobe(&format!("`{kw}`"), |token| token.kind == T::Keyword(kw))
    }

    fn ident(&mut self) -> Result<(String, Pos), Error> {
        match expect!(self.parser, T::Ident(_), "identifier")? {
            Token {
                kind: T::Ident(name),
                pos,
            } => Ok((name, pos)),
            token => Err(Error::UnexpectedToken {
                expected: "identifier".to_string(),
                found: token.kind.to_string(),
                pos: token.pos,
            }),
        }
    }

    /// `int | char | boolean | ClassName`, plus `void` for return types.
    fn parse_type(&mut self, allow_void: bool) -> Result<String, Error> {
        let builtin = if allow_void {
            optional!(self.parser, T::Keyword(K::Int | K::Char | K::Boolean | K::Void))
        } else {
            optional!(self.parser, T::Keyword(K::Int | K::Char | K::Boolean))
        };
        if let Some(Token {
            kind: T::Keyword(kw),
            ..
        }) = builtin
        {
            return Ok(kw.to_string());
        }
        if let Some(Token {
            kind: T::Ident(name),
            ..
        }) = optional!(self.parser, T::Ident(_))
        {
            return Ok(name);
        }
        Err(self.parser.unexpected("type"))
    }

    fn resolve(&self, name: &str, pos: Pos) -> Result<(Segment, u16), Error> {
        self.symbols
            .lookup(name)
            .map(|symbol| (symbol.kind.segment(), symbol.index))
            .ok_or_else(|| Error::UndefinedVariable {
                name: name.to_string(),
                pos,
            })
    }

    fn new_label(&mut self, prefix: &str) -> String {
        let label = format!("{prefix}{}", self.label_id);
        self.label_id += 1;
        label
    }
}

// ----------------------------------------------------------------------------
// Class

impl Engine {
    /// class = "class" NAME "{" { class-var-dec } { subroutine } "}"
    fn compile_class(&mut self) -> Result<(), Error> {
        self.eat_keyword(K::Class)?;
        self.class_name = self.ident()?.0;
        self.eat_symbol('{')?;

        while check!(self.parser, T::Keyword(K::Static | K::Field)) {
            self.compile_class_var_dec()?;
        }
        while check!(
            self.parser,
            T::Keyword(K::Constructor | K::Function | K::Method)
        ) {
            self.compile_subroutine()?;
        }

        self.eat_symbol('}')?;
        match self.parser.pos() {
            Some(pos) => Err(Error::TrailingInput { pos }),
            None => Ok(()),
        }
    }

    /// class-var-dec = ("static" | "field") type NAME { "," NAME } ";"
    fn compile_class_var_dec(&mut self) -> Result<(), Error> {
        let kind = match optional!(self.parser, T::Keyword(K::Static | K::Field)) {
            Some(Token {
                kind: T::Keyword(K::Static),
                ..
            }) => Kind::Static,
            Some(_) => Kind::Field,
            None => return Err(self.parser.unexpected("`static` or `field`")),
        };
        self.compile_names(kind)
    }

    /// type NAME { "," NAME } ";"
    fn compile_names(&mut self, kind: Kind) -> Result<(), Error> {
        let ty = self.parse_type(false)?;
        loop {
            let (name, _) = self.ident()?;
            self.symbols.define(&name, &ty, kind);
            if optional!(self.parser, T::Symbol(',')).is_none() {
                break;
            }
        }
        self.eat_symbol(';')?;
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Subroutine

impl Engine {
    /// subroutine = ("constructor" | "function" | "method") type NAME
    ///              "(" parameter-list ")" body
    fn compile_subroutine(&mut self) -> Result<(), Error> {
        self.symbols.start_subroutine();

        let Some(Token {
            kind: T::Keyword(kind),
            ..
        }) = optional!(
            self.parser,
            T::Keyword(K::Constructor | K::Function | K::Method)
        )
        else {
            return Err(self.parser.unexpected("subroutine declaration"));
        };
        self.parse_type(true)?;
        let (name, _) = self.ident()?;

        if kind == K::Method {
            let class_name = self.class_name.clone();
            self.symbols.define("this", &class_name, Kind::Arg);
        }

        self.eat_symbol('(')?;
        self.compile_parameter_list()?;
        self.eat_symbol(')')?;

        self.compile_subroutine_body(kind, &name)
    }

    /// parameter-list = [ type NAME { "," type NAME } ]
    fn compile_parameter_list(&mut self) -> Result<(), Error> {
        if check!(self.parser, T::Symbol(')')) {
            return Ok(());
        }
        loop {
            let ty = self.parse_type(false)?;
            let (name, _) = self.ident()?;
            self.symbols.define(&name, &ty, Kind::Arg);
            if optional!(self.parser, T::Symbol(',')).is_none() {
                return Ok(());
            }
        }
    }

    /// body = "{" { "var" type NAME { "," NAME } ";" } statements "}"
    fn compile_subroutine_body(&mut self, kind: K, name: &str) -> Result<(), Error> {
        self.eat_symbol('{')?;
        while optional!(self.parser, T::Keyword(K::Var)).is_some() {
            self.compile_names(Kind::Var)?;
        }

        let n_locals = self.symbols.var_count(Kind::Var);
        self.vm
            .function(&format!("{}.{}", self.class_name, name), n_locals);

        match kind {
            K::Constructor => {
                let n_fields = self.symbols.var_count(Kind::Field);
                self.vm.push(Segment::Constant, n_fields);
                self.vm.call("Memory.alloc", 1);
                self.vm.pop(Segment::Pointer, 0);
            }
            K::Method => {
                self.vm.push(Segment::Argument, 0);
                self.vm.pop(Segment::Pointer, 0);
            }
            _ => {}
        }

        self.compile_statements()?;
        self.eat_symbol('}')?;
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Statements

impl Engine {
    fn compile_statements(&mut self) -> Result<(), Error> {
        loop {
            let Some(T::Keyword(kw)) = self.parser.peek().map(|token| token.kind.clone()) else {
                return Ok(());
            };
            match kw {
                K::Let => self.compile_let()?,
                K::Do => self.compile_do()?,
                K::If => self.compile_if()?,
                K::While => self.compile_while()?,
                K::Return => self.compile_return()?,
                _ => return Ok(()),
            }
        }
    }

    /// let = "let" NAME [ "[" expr "]" ] "=" expr ";"
    fn compile_let(&mut self) -> Result<(), Error> {
        self.eat_keyword(K::Let)?;
        let (name, pos) = self.ident()?;

        let indexed = optional!(self.parser, T::Symbol('[')).is_some();
        if indexed {
            self.compile_expression()?;
            self.eat_symbol(']')?;
            let (seg, idx) = self.resolve(&name, pos)?;
            self.vm.push(seg, idx);
            self.vm.arith(Arith::Add);
        }

        self.eat_symbol('=')?;
        self.compile_expression()?;
        self.eat_symbol(';')?;

        if indexed {
            self.vm.pop(Segment::Temp, 0);
            self.vm.pop(Segment::Pointer, 1);
            self.vm.push(Segment::Temp, 0);
            self.vm.pop(Segment::That, 0);
        } else {
            let (seg, idx) = self.resolve(&name, pos)?;
            self.vm.pop(seg, idx);
        }
        Ok(())
    }

    /// do = "do" call ";"
    fn compile_do(&mut self) -> Result<(), Error> {
        self.eat_keyword(K::Do)?;
        let (name, _) = self.ident()?;
        self.compile_call(&name)?;
        self.vm.pop(Segment::Temp, 0);
        self.eat_symbol(';')?;
        Ok(())
    }

    /// return = "return" [ expr ] ";"
    fn compile_return(&mut self) -> Result<(), Error> {
        self.eat_keyword(K::Return)?;
        if check!(self.parser, T::Symbol(';')) {
            self.vm.push(Segment::Constant, 0);
        } else {
            self.compile_expression()?;
        }
        self.vm.ret();
        self.eat_symbol(';')?;
        Ok(())
    }

    /// if = "if" "(" expr ")" "{" statements "}" [ "else" "{" statements "}" ]
    fn compile_if(&mut self) -> Result<(), Error> {
        self.eat_keyword(K::If)?;
        self.eat_symbol('(')?;
        self.compile_expression()?;
        self.eat_symbol(')')?;

        let label_true = self.new_label("IF_TRUE");
        let label_false = self.new_label("IF_FALSE");
        let label_end = self.new_label("IF_END");

        self.vm.if_goto(&label_true);
        self.vm.goto(&label_false);
        self.vm.label(&label_true);
        self.compile_block()?;

        if optional!(self.parser, T::Keyword(K::Else)).is_some() {
            self.vm.goto(&label_end);
            self.vm.label(&label_false);
            self.compile_block()?;
            self.vm.label(&label_end);
        } else {
            self.vm.label(&label_false);
        }
        Ok(())
    }

    /// while = "while" "(" expr ")" "{" statements "}"
    fn compile_while(&mut self) -> Result<(), Error> {
        self.eat_keyword(K::While)?;
        let label_start = self.new_label("WHILE_EXP");
        let label_end = self.new_label("WHILE_END");

        self.vm.label(&label_start);
        self.eat_symbol('(')?;
        self.compile_expression()?;
        self.eat_symbol(')')?;
        self.vm.arith(Arith::Not);
        self.vm.if_goto(&label_end);

        self.compile_block()?;

        self.vm.goto(&label_start);
        self.vm.label(&label_end);
        Ok(())
    }

    fn compile_block(&mut self) -> Result<(), Error> {
        self.eat_symbol('{')?;
        self.compile_statements()?;
        self.eat_symbol('}')?;
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Expression

impl Engine {
    /// expr = term { op term }, strictly left to right
    fn compile_expression(&mut self) -> Result<(), Error> {
        self.compile_term()?;
        while let Some(Token {
            kind: T::Symbol(op),
            ..
        }) = optional!(
            self.parser,
            T::Symbol('+' | '-' | '*' | '/' | '&' | '|' | '<' | '>' | '=')
        ) {
            self.compile_term()?;
            self.write_op(op);
        }
        Ok(())
    }

    fn write_op(&mut self, op: char) {
        match op {
            '*' => self.vm.call("Math.multiply", 2),
            '/' => self.vm.call("Math.divide", 2),
            '+' => self.vm.arith(Arith::Add),
            '-' => self.vm.arith(Arith::Sub),
            '&' => self.vm.arith(Arith::And),
            '|' => self.vm.arith(Arith::Or),
            '<' => self.vm.arith(Arith::Lt),
            '>' => self.vm.arith(Arith::Gt),
            _ => self.vm.arith(Arith::Eq),
        }
    }

    fn compile_term(&mut self) -> Result<(), Error> {
        let Some(token) = self.parser.next() else {
            return Err(Error::UnexpectedEof {
                expected: "term".to_string(),
            });
        };

        match token.kind {
            T::IntConst(n) => self.vm.push(Segment::Constant, n),

            T::StringConst(text) => {
                let len = u16::try_from(text.chars().count()).map_err(|_| {
                    Error::IntegerOverflow {
                        text: text.chars().count().to_string(),
                        pos: token.pos,
                    }
                })?;
                self.vm.push(Segment::Constant, len);
                self.vm.call("String.new", 1);
                for ch in text.chars() {
                    // the lexer rejects characters above 32767
                    self.vm.push(Segment::Constant, u32::from(ch) as u16);
                    self.vm.call("String.appendChar", 2);
                }
            }

            T::Keyword(K::True) => {
                self.vm.push(Segment::Constant, 0);
                self.vm.arith(Arith::Not);
            }
            T::Keyword(K::False | K::Null) => self.vm.push(Segment::Constant, 0),
            T::Keyword(K::This) => self.vm.push(Segment::Pointer, 0),

            T::Symbol(op @ ('-' | '~')) => {
                self.compile_term()?;
                self.vm
                    .arith(if op == '-' { Arith::Neg } else { Arith::Not });
            }

            T::Symbol('(') => {
                self.compile_expression()?;
                self.eat_symbol(')')?;
            }

            T::Ident(name) => {
                if optional!(self.parser, T::Symbol('[')).is_some() {
                    self.compile_expression()?;
                    self.eat_symbol(']')?;
                    let (seg, idx) = self.resolve(&name, token.pos)?;
                    self.vm.push(seg, idx);
                    self.vm.arith(Arith::Add);
                    self.vm.pop(Segment::Pointer, 1);
                    self.vm.push(Segment::That, 0);
                } else if check!(self.parser, T::Symbol('(' | '.')) {
                    self.compile_call(&name)?;
                } else {
                    let (seg, idx) = self.resolve(&name, token.pos)?;
                    self.vm.push(seg, idx);
                }
            }

            other => {
                return Err(Error::UnexpectedToken {
                    expected: "term".to_string(),
                    found: other.to_string(),
                    pos: token.pos,
                })
            }
        }
        Ok(())
    }

    /// call = NAME "(" exprs ")" | NAME "." NAME "(" exprs ")"
    fn compile_call(&mut self, name: &str) -> Result<(), Error> {
        let mut n_args = 0;
        let callee = if optional!(self.parser, T::Symbol('.')).is_some() {
            let (sub, _) = self.ident()?;
            match self.symbols.lookup(name) {
                Some(symbol) => {
                    let (seg, idx, ty) = (symbol.kind.segment(), symbol.index, symbol.ty.clone());
                    self.vm.push(seg, idx);
                    n_args += 1;
                    format!("{ty}.{sub}")
                }
                None => format!("{name}.{sub}"),
            }
        } else {
            self.vm.push(Segment::Pointer, 0);
            n_args += 1;
            format!("{}.{}", self.class_name, name)
        };

        self.eat_symbol('(')?;
        n_args += self.compile_expression_list()?;
        self.eat_symbol(')')?;

        self.vm.call(&callee, n_args);
        Ok(())
    }

    /// exprs = [ expr { "," expr } ]
    fn compile_expression_list(&mut self) -> Result<u16, Error> {
        if check!(self.parser, T::Symbol(')')) {
            return Ok(0);
        }
        self.compile_expression()?;
        let mut count = 1;
        while optional!(self.parser, T::Symbol(',')).is_some() {
            self.compile_expression()?;
            count += 1;
        }
        Ok(count)
    }
}
