//! Strategy trees
//!
//! A strategy is a small program describing which methods to apply to a graph or mesh, in what
//! order, with which parameters, and under which conditions. Each *domain* (graph ordering, mesh
//! ordering, graph separation, mesh separation) declares a method table and a variable table
//! through [`StratDomain`]; one parser and one evaluator serve all of them.
//!
//! ```text
//! n{sep=/(vert>120)?m{vert=100,low=g,asc=f}:g f;,ole=f{cmin=15},ose=s}
//! ```
//!
//! Strategy trees are built once and only read afterwards, so a tree can be shared by every
//! recursive invocation of an ordering.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::defs::Gnum;
use crate::strat_parser::StratParser;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StratError {
    #[error("{domain}: unknown method at \"{at}\"")]
    UnknownMethod { domain: &'static str, at: String },

    #[error("{domain}: ambiguous method name at \"{at}\"")]
    AmbiguousMethod { domain: &'static str, at: String },

    #[error("{domain}: unknown parameter \"{name}\" for method \"{method}\"")]
    UnknownParam { domain: &'static str, method: &'static str, name: String },

    #[error("{domain}: unknown test variable \"{name}\"")]
    UnknownVar { domain: &'static str, name: String },

    #[error("invalid number at \"{at}\"")]
    BadNumber { at: String },

    #[error("invalid case value '{found}', expected one of \"{allowed}\"")]
    BadCase { found: char, allowed: &'static str },

    #[error("syntax error at \"{at}\": expected {expected}")]
    Syntax { at: String, expected: &'static str },

    #[error("type mismatch in test: {0}")]
    TestType(&'static str),

    #[error("{domain}: {what} is not supported")]
    Unsupported { domain: &'static str, what: &'static str },
}

/// Value of a test expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StratVal {
    Log(bool),
    Int(Gnum),
    Dbl(f64),
}

/// One entry of a method table: method code and constructor with default parameters
pub struct StratMethodTab<M> {
    pub name: &'static str,
    pub init: fn() -> M,
}

/// One entry of a variable table: variable name and accessor into the live structure
pub struct StratVarTab<T> {
    pub name: &'static str,
    pub read: fn(&T) -> StratVal,
}

/// Method of a strategy domain, carrying its parameter values
pub trait StratMethod: Clone + fmt::Debug {
    /// code of the method in strategy strings
    fn code(&self) -> &'static str;

    fn params(&self) -> Option<&dyn ParamSet> {
        None
    }

    fn params_mut(&mut self) -> Option<&mut dyn ParamSet> {
        None
    }
}

/// Grammar tables of a strategy domain
pub trait StratDomain: Sized + 'static {
    type Method: StratMethod;

    /// structure on which tests are evaluated
    type Data;

    const NAME: &'static str;

    fn methods() -> &'static [StratMethodTab<Self::Method>];

    fn vars() -> &'static [StratVarTab<Self::Data>];
}

/// Parameter table of a method, usually derived with `#[derive(StratParams)]`
pub trait ParamSet {
    fn param_names(&self) -> &'static [&'static str];

    /// Read the value of parameter `name`, which must be one of [`ParamSet::param_names`]
    fn parse_param(&mut self, name: &str, parser: &mut StratParser<'_>) -> Result<(), StratError>;

    fn save_params(&self, out: &mut String);
}

/// Type of a method parameter
pub trait ParamValue: Sized {
    fn parse_value(parser: &mut StratParser<'_>) -> Result<Self, StratError>;

    fn save_value(&self, out: &mut String);
}

impl ParamValue for Gnum {
    fn parse_value(parser: &mut StratParser<'_>) -> Result<Self, StratError> {
        parser.parse_int()
    }

    fn save_value(&self, out: &mut String) {
        out.push_str(&self.to_string());
    }
}

impl ParamValue for f64 {
    fn parse_value(parser: &mut StratParser<'_>) -> Result<Self, StratError> {
        parser.parse_double()
    }

    fn save_value(&self, out: &mut String) {
        out.push_str(&format!("{self:?}"));
    }
}

impl<D: StratDomain> ParamValue for Strat<D> {
    fn parse_value(parser: &mut StratParser<'_>) -> Result<Self, StratError> {
        parser.parse_strat::<D>()
    }

    fn save_value(&self, out: &mut String) {
        self.save_into(out);
    }
}

/// Declare a character-valued method parameter
macro_rules! strat_case {
    ($(#[$m:meta])* $vis:vis enum $name:ident { $($(#[$vm:meta])* $var:ident = $ch:literal),+ $(,)? }) => {
        $(#[$m])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        $vis enum $name {
            $($(#[$vm])* $var),+
        }

        impl $crate::strat::ParamValue for $name {
            fn parse_value(
                parser: &mut $crate::strat_parser::StratParser<'_>,
            ) -> ::std::result::Result<Self, $crate::strat::StratError> {
                const ALLOWED: &str = concat!($($ch),+);
                match parser.parse_case()?.to_ascii_lowercase() {
                    $($ch => Ok($name::$var),)+
                    found => Err($crate::strat::StratError::BadCase { found, allowed: ALLOWED }),
                }
            }

            fn save_value(&self, out: &mut String) {
                out.push(match self {
                    $($name::$var => $ch),+
                });
            }
        }
    };
}
pub(crate) use strat_case;

/// Strategy tree
pub enum Strat<D: StratDomain> {
    /// does nothing
    Empty,
    Method(Box<D::Method>),
    /// apply the first strategy, then the second
    Concat(Box<Strat<D>>, Box<Strat<D>>),
    Cond {
        test: StratTest<D>,
        then: Box<Strat<D>>,
        els: Option<Box<Strat<D>>>,
    },
    /// apply both strategies from the same start and keep the best result
    Select(Box<Strat<D>>, Box<Strat<D>>),
}

impl<D: StratDomain> Strat<D> {
    pub fn parse(text: &str) -> Result<Self, StratError> {
        StratParser::new(text).parse_all::<D>()
    }

    pub fn method(meth: D::Method) -> Self {
        Strat::Method(Box::new(meth))
    }

    /// `self` followed by `next`
    pub fn then(self, next: Strat<D>) -> Self {
        Strat::Concat(Box::new(self), Box::new(next))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Strat::Empty)
    }

    /// Method of a single-method strategy
    pub fn as_method(&self) -> Option<&D::Method> {
        match self {
            Strat::Method(meth) => Some(&**meth),
            _ => None,
        }
    }

    /// Serialized form, parsing back to an equivalent tree
    pub fn save(&self) -> String {
        let mut out = String::new();
        self.save_into(&mut out);
        out
    }

    pub(crate) fn save_into(&self, out: &mut String) {
        match self {
            Strat::Empty => {}
            Strat::Method(meth) => {
                out.push_str(meth.code());
                if let Some(params) = meth.params() {
                    if !params.param_names().is_empty() {
                        out.push('{');
                        params.save_params(out);
                        out.push('}');
                    }
                }
            }
            Strat::Concat(first, second) => {
                for s in [first, second] {
                    if matches!(**s, Strat::Select(..) | Strat::Empty) {
                        out.push('(');
                        s.save_into(out);
                        out.push(')');
                    } else {
                        s.save_into(out);
                    }
                }
            }
            Strat::Cond { test, then, els } => {
                out.push('/');
                test.save_into(out);
                out.push('?');
                then.save_into(out);
                if let Some(els) = els {
                    out.push(':');
                    els.save_into(out);
                }
                out.push(';');
            }
            Strat::Select(first, second) => {
                first.save_into(out);
                out.push('|');
                second.save_into(out);
            }
        }
    }
}

impl<D: StratDomain> Default for Strat<D> {
    fn default() -> Self {
        Strat::Empty
    }
}

impl<D: StratDomain> Clone for Strat<D> {
    fn clone(&self) -> Self {
        match self {
            Strat::Empty => Strat::Empty,
            Strat::Method(m) => Strat::Method(m.clone()),
            Strat::Concat(a, b) => Strat::Concat(a.clone(), b.clone()),
            Strat::Cond { test, then, els } => Strat::Cond {
                test: test.clone(),
                then: then.clone(),
                els: els.clone(),
            },
            Strat::Select(a, b) => Strat::Select(a.clone(), b.clone()),
        }
    }
}

impl<D: StratDomain> fmt::Display for Strat<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.save())
    }
}

impl<D: StratDomain> fmt::Debug for Strat<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Strat<{}>(\"{}\")", D::NAME, self.save())
    }
}

impl<D: StratDomain> FromStr for Strat<D> {
    type Err = StratError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strat::parse(s)
    }
}

/// Test expression of a conditional strategy
pub enum StratTest<D: StratDomain> {
    Or(Box<StratTest<D>>, Box<StratTest<D>>),
    And(Box<StratTest<D>>, Box<StratTest<D>>),
    Not(Box<StratTest<D>>),
    Eq(Box<StratTest<D>>, Box<StratTest<D>>),
    Gt(Box<StratTest<D>>, Box<StratTest<D>>),
    Lt(Box<StratTest<D>>, Box<StratTest<D>>),
    Add(Box<StratTest<D>>, Box<StratTest<D>>),
    Sub(Box<StratTest<D>>, Box<StratTest<D>>),
    Mul(Box<StratTest<D>>, Box<StratTest<D>>),
    Mod(Box<StratTest<D>>, Box<StratTest<D>>),
    Val(StratVal),
    Var(&'static StratVarTab<D::Data>),
}

impl<D: StratDomain> Clone for StratTest<D> {
    fn clone(&self) -> Self {
        use StratTest::*;
        match self {
            Or(a, b) => Or(a.clone(), b.clone()),
            And(a, b) => And(a.clone(), b.clone()),
            Not(a) => Not(a.clone()),
            Eq(a, b) => Eq(a.clone(), b.clone()),
            Gt(a, b) => Gt(a.clone(), b.clone()),
            Lt(a, b) => Lt(a.clone(), b.clone()),
            Add(a, b) => Add(a.clone(), b.clone()),
            Sub(a, b) => Sub(a.clone(), b.clone()),
            Mul(a, b) => Mul(a.clone(), b.clone()),
            Mod(a, b) => Mod(a.clone(), b.clone()),
            Val(v) => Val(*v),
            Var(v) => Var(*v),
        }
    }
}

impl<D: StratDomain> fmt::Debug for StratTest<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.save_into(&mut out);
        write!(f, "StratTest<{}>(\"{}\")", D::NAME, out)
    }
}

/// Arithmetic on two values, promoting integers to doubles when mixed
fn arith(
    a: StratVal,
    b: StratVal,
    int: fn(Gnum, Gnum) -> Option<Gnum>,
    dbl: fn(f64, f64) -> f64,
) -> Result<StratVal, StratError> {
    match (a, b) {
        (StratVal::Int(a), StratVal::Int(b)) => int(a, b)
            .map(StratVal::Int)
            .ok_or(StratError::TestType("integer overflow")),
        (StratVal::Int(a), StratVal::Dbl(b)) => Ok(StratVal::Dbl(dbl(a as f64, b))),
        (StratVal::Dbl(a), StratVal::Int(b)) => Ok(StratVal::Dbl(dbl(a, b as f64))),
        (StratVal::Dbl(a), StratVal::Dbl(b)) => Ok(StratVal::Dbl(dbl(a, b))),
        _ => Err(StratError::TestType("arithmetic on logical value")),
    }
}

/// Three-way comparison of two numeric values
fn compare(a: StratVal, b: StratVal) -> Result<std::cmp::Ordering, StratError> {
    let ord = match (a, b) {
        (StratVal::Int(a), StratVal::Int(b)) => Some(a.cmp(&b)),
        (StratVal::Int(a), StratVal::Dbl(b)) => (a as f64).partial_cmp(&b),
        (StratVal::Dbl(a), StratVal::Int(b)) => a.partial_cmp(&(b as f64)),
        (StratVal::Dbl(a), StratVal::Dbl(b)) => a.partial_cmp(&b),
        (StratVal::Log(a), StratVal::Log(b)) => Some(a.cmp(&b)),
        _ => None,
    };
    ord.ok_or(StratError::TestType("comparison between incompatible values"))
}

impl<D: StratDomain> StratTest<D> {
    /// Value of the expression on the live structure `data`
    pub fn eval(&self, data: &D::Data) -> Result<StratVal, StratError> {
        use std::cmp::Ordering;
        use StratTest::*;

        let log = |t: &StratTest<D>| -> Result<bool, StratError> {
            match t.eval(data)? {
                StratVal::Log(b) => Ok(b),
                _ => Err(StratError::TestType("logical operator on numeric value")),
            }
        };
        Ok(match self {
            Or(a, b) => StratVal::Log(log(a)? || log(b)?),
            And(a, b) => StratVal::Log(log(a)? && log(b)?),
            Not(a) => StratVal::Log(!log(a)?),
            Eq(a, b) => StratVal::Log(compare(a.eval(data)?, b.eval(data)?)? == Ordering::Equal),
            Gt(a, b) | Lt(a, b) => {
                let (va, vb) = (a.eval(data)?, b.eval(data)?);
                if matches!(va, StratVal::Log(_)) || matches!(vb, StratVal::Log(_)) {
                    return Err(StratError::TestType("ordering of logical values"));
                }
                let ord = compare(va, vb)?;
                StratVal::Log(if matches!(self, Gt(..)) {
                    ord == Ordering::Greater
                } else {
                    ord == Ordering::Less
                })
            }
            Add(a, b) => arith(a.eval(data)?, b.eval(data)?, Gnum::checked_add, |x, y| x + y)?,
            Sub(a, b) => arith(a.eval(data)?, b.eval(data)?, Gnum::checked_sub, |x, y| x - y)?,
            Mul(a, b) => arith(a.eval(data)?, b.eval(data)?, Gnum::checked_mul, |x, y| x * y)?,
            Mod(a, b) => match (a.eval(data)?, b.eval(data)?) {
                (StratVal::Int(_), StratVal::Int(0)) => {
                    return Err(StratError::TestType("modulo by zero"))
                }
                (StratVal::Int(x), StratVal::Int(y)) => StratVal::Int(
                    x.checked_rem(y).ok_or(StratError::TestType("integer overflow"))?,
                ),
                _ => return Err(StratError::TestType("modulo of non-integer values")),
            },
            Val(v) => *v,
            Var(var) => (var.read)(data),
        })
    }

    /// Truth value of a condition
    pub fn check(&self, data: &D::Data) -> Result<bool, StratError> {
        match self.eval(data)? {
            StratVal::Log(b) => Ok(b),
            _ => Err(StratError::TestType("condition is not a logical value")),
        }
    }

    /* Binding strength, for parenthesizing on save */
    fn prec(&self) -> u8 {
        use StratTest::*;
        match self {
            Or(..) => 1,
            And(..) => 2,
            Not(..) => 3,
            Eq(..) | Gt(..) | Lt(..) => 4,
            Add(..) | Sub(..) => 5,
            Mul(..) => 6,
            Mod(..) => 7,
            Val(..) | Var(..) => 8,
        }
    }

    pub(crate) fn save_into(&self, out: &mut String) {
        use StratTest::*;

        fn child<D: StratDomain>(t: &StratTest<D>, paren: bool, out: &mut String) {
            if paren {
                out.push('(');
                t.save_into(out);
                out.push(')');
            } else {
                t.save_into(out);
            }
        }

        let prec = self.prec();
        let (a, b, op, nonassoc) = match self {
            Or(a, b) => (a, b, '|', false),
            And(a, b) => (a, b, '&', false),
            Eq(a, b) => (a, b, '=', true),
            Gt(a, b) => (a, b, '>', true),
            Lt(a, b) => (a, b, '<', true),
            Add(a, b) => (a, b, '+', false),
            Sub(a, b) => (a, b, '-', false),
            Mul(a, b) => (a, b, '*', false),
            Mod(a, b) => (a, b, '%', false),
            Not(a) => {
                out.push('!');
                child(a, a.prec() < prec, out);
                return;
            }
            Val(StratVal::Int(i)) => {
                out.push_str(&i.to_string());
                return;
            }
            Val(StratVal::Dbl(d)) => {
                out.push_str(&format!("{d:?}"));
                return;
            }
            Val(StratVal::Log(l)) => {
                // no boolean literals in the grammar
                out.push_str(if *l { "(0=0)" } else { "(0=1)" });
                return;
            }
            Var(var) => {
                out.push_str(var.name);
                return;
            }
        };
        child(a, a.prec() < prec || (nonassoc && a.prec() == prec), out);
        out.push(op);
        child(b, b.prec() <= prec, out);
    }
}

#[cfg(test)]
pub(crate) mod test_domain {
    //! A small domain used by the parser tests

    use super::*;

    pub struct Counter {
        pub vert: Gnum,
        pub rat: f64,
    }

    strat_case! {
        pub enum Flavor {
            Heavy = 'h',
            Random = 'r',
        }
    }

    #[derive(Clone, Debug, StratParams)]
    pub struct AlphaParam {
        pub size: Gnum,
        pub frac: f64,
        #[strat(name = "type")]
        pub kind: Flavor,
        pub sub: Strat<TestDomain>,
    }

    impl Default for AlphaParam {
        fn default() -> Self {
            Self { size: 10, frac: 0.5, kind: Flavor::Heavy, sub: Strat::Empty }
        }
    }

    #[derive(Clone, Debug)]
    pub enum TestMethod {
        Alpha(AlphaParam),
        Beta,
        Gamma,
        GammaLong,
    }

    impl StratMethod for TestMethod {
        fn code(&self) -> &'static str {
            match self {
                TestMethod::Alpha(_) => "a",
                TestMethod::Beta => "b",
                TestMethod::Gamma => "g",
                TestMethod::GammaLong => "gl",
            }
        }

        fn params(&self) -> Option<&dyn ParamSet> {
            match self {
                TestMethod::Alpha(p) => Some(p),
                _ => None,
            }
        }

        fn params_mut(&mut self) -> Option<&mut dyn ParamSet> {
            match self {
                TestMethod::Alpha(p) => Some(p),
                _ => None,
            }
        }
    }

    pub enum TestDomain {}

    static METHODS: [StratMethodTab<TestMethod>; 4] = [
        StratMethodTab { name: "a", init: || TestMethod::Alpha(AlphaParam::default()) },
        StratMethodTab { name: "b", init: || TestMethod::Beta },
        StratMethodTab { name: "g", init: || TestMethod::Gamma },
        StratMethodTab { name: "gl", init: || TestMethod::GammaLong },
    ];

    static VARS: [StratVarTab<Counter>; 2] = [
        StratVarTab { name: "vert", read: |c| StratVal::Int(c.vert) },
        StratVarTab { name: "rat", read: |c| StratVal::Dbl(c.rat) },
    ];

    impl StratDomain for TestDomain {
        type Method = TestMethod;
        type Data = Counter;

        const NAME: &'static str = "test";

        fn methods() -> &'static [StratMethodTab<TestMethod>] {
            &METHODS
        }

        fn vars() -> &'static [StratVarTab<Counter>] {
            &VARS
        }
    }

    /// Domain whose method table holds two names differing only by case
    pub enum AmbiguousDomain {}

    static AMBIGUOUS: [StratMethodTab<TestMethod>; 2] = [
        StratMethodTab { name: "b", init: || TestMethod::Beta },
        StratMethodTab { name: "B", init: || TestMethod::Gamma },
    ];

    impl StratDomain for AmbiguousDomain {
        type Method = TestMethod;
        type Data = Counter;

        const NAME: &'static str = "ambiguous";

        fn methods() -> &'static [StratMethodTab<TestMethod>] {
            &AMBIGUOUS
        }

        fn vars() -> &'static [StratVarTab<Counter>] {
            &VARS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_domain::*;
    use super::*;

    fn cond(text: &str, vert: Gnum) -> Result<bool, StratError> {
        let strat = Strat::<TestDomain>::parse(text).unwrap();
        let Strat::Cond { test, .. } = strat else {
            panic!("not a condition: {text}")
        };
        test.check(&Counter { vert, rat: 0.25 })
    }

    #[test]
    fn evaluates_conditions() {
        assert_eq!(cond("/vert>10?b;", 11), Ok(true));
        assert_eq!(cond("/vert>10?b;", 10), Ok(false));
        assert_eq!(cond("/(vert<5)|(vert=7)?b;", 7), Ok(true));
        assert_eq!(cond("/!(vert<5)&(vert%2=1)?b;", 9), Ok(true));
        assert_eq!(cond("/vert*2-3=17?b;", 10), Ok(true));
        assert_eq!(cond("/rat*4=1?b;", 0), Ok(true));
        assert_eq!(cond("/rat<0.3?b;", 0), Ok(true));
    }

    #[test]
    fn rejects_type_mismatch() {
        assert!(matches!(cond("/vert?b;", 1), Err(StratError::TestType(_))));
        assert!(matches!(cond("/(vert>1)+1>0?b;", 2), Err(StratError::TestType(_))));
        assert!(matches!(cond("/rat%2=0?b;", 2), Err(StratError::TestType(_))));
        assert!(matches!(cond("/vert%0=0?b;", 2), Err(StratError::TestType(_))));
    }

    #[test]
    fn integer_overflow_is_an_error() {
        let overflow = Err(StratError::TestType("integer overflow"));
        assert_eq!(cond("/vert*9223372036854775807>1?b;", 3), overflow);
        assert_eq!(cond("/vert+9223372036854775807>1?b;", 1), overflow);
        assert_eq!(cond("/0-vert-9223372036854775807<1?b;", 2), overflow);
        assert_eq!(cond("/(0-9223372036854775807-vert)%(0-1)=0?b;", 1), overflow);
        assert_eq!(cond("/vert*9223372036854775807>1?b;", 1), Ok(true));
    }

    #[test]
    fn saves_tests_with_needed_parentheses() {
        for text in [
            "/vert>10?b;",
            "/(vert<5)|(vert=7)?b:g;",
            "/!(vert<5)&(vert%2=1)?b;",
            "/vert-(3-2)>rat*(vert+1)?b;",
        ] {
            let strat = Strat::<TestDomain>::parse(text).unwrap();
            let saved = strat.save();
            let again = Strat::<TestDomain>::parse(&saved).unwrap();
            assert_eq!(saved, again.save(), "{text}");
            for vert in 0..12 {
                assert_eq!(cond(text, vert), cond(&saved, vert), "{text} / {saved}");
            }
        }
    }
}
