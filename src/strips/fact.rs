use std::{borrow::Borrow, collections::HashMap, fmt, rc::Rc};

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Rc<str>);

impl Symbol {
    pub fn new(name: &str) -> Self {
        Self(Rc::from(name))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Self(Rc::from(name))
    }
}

impl From<&Symbol> for Symbol {
    fn from(symbol: &Symbol) -> Self {
        symbol.clone()
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

pub(crate) fn write_atom<T: fmt::Display>(f: &mut fmt::Formatter<'_>, truth: bool, name: &Symbol, args: &[T]) -> fmt::Result {
    if !truth {
        write!(f, "!")?;
    }
    write!(f, "{}(", name)?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{}", arg)?;
    }
    write!(f, ")")
}

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fact {
    predicate: Symbol,
    args: Vec<Symbol>,
    truth: bool,
}

impl Fact {
    pub fn new<P, I, A>(predicate: P, args: I) -> Self
    where
        P: Into<Symbol>,
        I: IntoIterator<Item = A>,
        A: Into<Symbol>,
    {
        Self::with_truth(predicate, args, true)
    }

    pub fn negative<P, I, A>(predicate: P, args: I) -> Self
    where
        P: Into<Symbol>,
        I: IntoIterator<Item = A>,
        A: Into<Symbol>,
    {
        Self::with_truth(predicate, args, false)
    }

    pub fn with_truth<P, I, A>(predicate: P, args: I, truth: bool) -> Self
    where
        P: Into<Symbol>,
        I: IntoIterator<Item = A>,
        A: Into<Symbol>,
    {
        Self {
            predicate: predicate.into(),
            args: args.into_iter().map(Into::into).collect(),
            truth,
        }
    }

    #[inline]
    pub fn predicate(&self) -> &Symbol {
        &self.predicate
    }

    #[inline]
    pub fn args(&self) -> &[Symbol] {
        &self.args
    }

    #[inline]
    pub fn truth(&self) -> bool {
        self.truth
    }

    pub fn negated(&self) -> Self {
        Self { predicate: self.predicate.clone(), args: self.args.clone(), truth: !self.truth }
    }

    pub fn positive(&self) -> Self {
        Self { predicate: self.predicate.clone(), args: self.args.clone(), truth: true }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_atom(f, self.truth, &self.predicate, self.args.as_slice())
    }
}

impl fmt::Debug for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Symbol(Symbol),
    Param(Symbol),
}

impl Term {
    pub fn name(&self) -> &Symbol {
        match self {
            Term::Symbol(s) | Term::Param(s) => s,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Condition {
    predicate: Symbol,
    args: Vec<Term>,
    truth: bool,
}

impl Condition {
    pub fn new<P: Into<Symbol>>(predicate: P, args: Vec<Term>, truth: bool) -> Self {
        Self { predicate: predicate.into(), args, truth }
    }

    /// Builds a condition from raw argument names. Names listed in `params` become
    /// placeholders, everything else is a fixed symbol.
    pub fn from_names<P, A>(predicate: P, args: &[A], params: &[Symbol], truth: bool) -> Self
    where
        P: Into<Symbol>,
        A: AsRef<str>,
    {
        let args = args
            .iter()
            .map(|a| {
                let a = a.as_ref();
                if params.iter().any(|p| p.as_str() == a) {
                    Term::Param(Symbol::new(a))
                } else {
                    Term::Symbol(Symbol::new(a))
                }
            })
            .collect();
        Self::new(predicate, args, truth)
    }

    #[inline]
    pub fn predicate(&self) -> &Symbol {
        &self.predicate
    }

    #[inline]
    pub fn args(&self) -> &[Term] {
        &self.args
    }

    #[inline]
    pub fn truth(&self) -> bool {
        self.truth
    }

    /// Substitutes bound placeholders. Arguments missing from `binding` pass through
    /// unchanged under their own name.
    pub fn ground(&self, binding: &HashMap<&str, &Symbol>) -> Fact {
        let args = self
            .args
            .iter()
            .map(|term| match term {
                Term::Param(name) => binding.get(name.as_str()).map(|s| (*s).clone()).unwrap_or_else(|| name.clone()),
                Term::Symbol(s) => s.clone(),
            })
            .collect::<Vec<_>>();
        Fact::with_truth(self.predicate.clone(), args, self.truth)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_atom(f, self.truth, &self.predicate, self.args.as_slice())
    }
}
