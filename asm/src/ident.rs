use arch::reg::{PREDEFINED, VAR_BASE};
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ident {
    Predefined,
    /// Code label, with the 1-based source line that defined it.
    Label(usize),
    Variable,
}

/// Assembler symbol table: name -> (kind, address)
#[derive(Debug, Clone)]
pub struct Idents {
    map: IndexMap<String, (Ident, u16)>,
    next_var: u16,
}

impl Idents {
    /// Fresh table holding only the predefined symbols.
    pub fn new() -> Self {
        let map = PREDEFINED
            .iter()
            .map(|(name, addr)| (name.clone(), (Ident::Predefined, *addr)))
            .collect();
        Idents {
            map,
            next_var: VAR_BASE,
        }
    }

    /// Bind a code label to a ROM address.
    /// Returns the already existing entry if the name is taken.
    pub fn insert_label(&mut self, name: &str, line: usize, pc: u16) -> Option<(Ident, u16)> {
        if let Some(prev) = self.map.get(name) {
            return Some(prev.clone());
        }
        self.map.insert(name.to_string(), (Ident::Label(line), pc));
        None
    }

    pub fn get(&self, name: &str) -> Option<&(Ident, u16)> {
        self.map.get(name)
    }

    pub fn get_val(&self, name: &str) -> Option<u16> {
        self.map.get(name).map(|(_, val)| *val)
    }

    /// Address of `name`, allocating the next variable cell on first use.
    pub fn resolve(&mut self, name: &str) -> u16 {
        if let Some(val) = self.get_val(name) {
            return val;
        }
        let addr = self.next_var;
        self.next_var += 1;
        self.map.insert(name.to_string(), (Ident::Variable, addr));
        addr
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &(Ident, u16))> {
        self.map.iter()
    }
}

impl Default for Idents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variables_are_sequential_and_stable() {
        let mut idents = Idents::new();
        assert_eq!(idents.resolve("i"), 16);
        assert_eq!(idents.resolve("sum"), 17);
        assert_eq!(idents.resolve("i"), 16);
        assert_eq!(idents.resolve("KBD"), 24576);
        assert_eq!(idents.get("sum"), Some(&(Ident::Variable, 17)));
    }

    #[test]
    fn labels_are_not_redefined() {
        let mut idents = Idents::new();
        assert_eq!(idents.insert_label("LOOP", 3, 4), None);
        assert_eq!(idents.insert_label("LOOP", 9, 7), Some((Ident::Label(3), 4)));
        assert_eq!(idents.get_val("LOOP"), Some(4));
        assert_eq!(idents.insert_label("SP", 1, 0), Some((Ident::Predefined, 0)));
    }
}
