use arch::vm::Segment;
use std::collections::HashMap;
use strum::{Display, EnumIter};

/// Storage kind of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Kind {
    Static,
    Field,
    Arg,
    Var,
}

impl Kind {
    pub fn segment(self) -> Segment {
        match self {
            Kind::Static => Segment::Static,
            Kind::Field => Segment::This,
            Kind::Arg => Segment::Argument,
            Kind::Var => Segment::Local,
        }
    }

    fn is_class_scope(self) -> bool {
        matches!(self, Kind::Static | Kind::Field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub ty: String,
    pub kind: Kind,
    pub index: u16,
}

/// Two-level scope: class (static, field) and subroutine (arg, var).
#[derive(Debug, Default)]
pub struct SymbolTable {
    class: HashMap<String, Symbol>,
    subroutine: HashMap<String, Symbol>,
    counts: HashMap<Kind, u16>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget arguments and locals; class scope is kept.
    pub fn start_subroutine(&mut self) {
        self.subroutine.clear();
        self.counts.remove(&Kind::Arg);
        self.counts.remove(&Kind::Var);
    }

    /// Bind `name` to the next free index of `kind`.
    pub fn define(&mut self, name: &str, ty: &str, kind: Kind) -> u16 {
        let count = self.counts.entry(kind).or_default();
        let index = *count;
        *count += 1;
        let symbol = Symbol {
            ty: ty.to_string(),
            kind,
            index,
        };
        if kind.is_class_scope() {
            self.class.insert(name.to_string(), symbol);
        } else {
            self.subroutine.insert(name.to_string(), symbol);
        }
        index
    }

    /// Subroutine scope first, then class scope. `None` means a class or
    /// subroutine name.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.subroutine.get(name).or_else(|| self.class.get(name))
    }

    pub fn kind_of(&self, name: &str) -> Option<Kind> {
        self.lookup(name).map(|s| s.kind)
    }

    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.lookup(name).map(|s| s.ty.as_str())
    }

    pub fn index_of(&self, name: &str) -> Option<u16> {
        self.lookup(name).map(|s| s.index)
    }

    pub fn var_count(&self, kind: Kind) -> u16 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }
}
