//! Strategy string parser
//!
//! One recursive-descent parser serves every strategy domain: the grammar tables of the domain
//! being parsed are taken from the [`StratDomain`] type parameter, and sub-strategy parameters
//! re-enter the parser with the tables of their own domain.

use crate::defs::Gnum;
use crate::strat::{Strat, StratDomain, StratError, StratMethod, StratTest, StratVal};

pub struct StratParser<'a> {
    text: &'a str,
    pos: usize,
    /// domain and method whose parameters are being read
    meth: (&'static str, &'static str),
}

/// Characters ending a (possibly empty) concatenation
fn ends_concat(c: Option<char>) -> bool {
    matches!(c, None | Some('|' | ')' | ';' | ':' | '}' | ','))
}

impl<'a> StratParser<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0, meth: ("", "") }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Remaining text, shortened for error messages
    fn context(&self) -> String {
        let rest = self.rest();
        if rest.is_empty() {
            return "end of string".to_owned();
        }
        rest.chars().take(24).collect()
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.rest().chars().next()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char, expected: &'static str) -> Result<(), StratError> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error_syntax(expected))
        }
    }

    fn error_syntax(&self, expected: &'static str) -> StratError {
        StratError::Syntax { at: self.context(), expected }
    }

    pub fn error_unknown_param(&self, name: &str) -> StratError {
        StratError::UnknownParam { domain: self.meth.0, method: self.meth.1, name: name.to_owned() }
    }

    /// Whole string as a strategy of domain `D`
    pub fn parse_all<D: StratDomain>(&mut self) -> Result<Strat<D>, StratError> {
        let strat = self.parse_strat::<D>()?;
        if self.peek().is_some() {
            return Err(self.error_syntax("end of strategy"));
        }
        Ok(strat)
    }

    /// Strategy of domain `D`, stopping at the first character that cannot continue it
    pub fn parse_strat<D: StratDomain>(&mut self) -> Result<Strat<D>, StratError> {
        let mut left = self.parse_concat::<D>()?;
        while self.eat('|') {
            let right = self.parse_concat::<D>()?;
            left = Strat::Select(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_concat<D: StratDomain>(&mut self) -> Result<Strat<D>, StratError> {
        let mut left: Option<Strat<D>> = None;
        while !ends_concat(self.peek()) {
            let strat = self.parse_cond::<D>()?;
            left = Some(match left {
                None => strat,
                Some(prev) => prev.then(strat),
            });
        }
        Ok(left.unwrap_or(Strat::Empty))
    }

    fn parse_cond<D: StratDomain>(&mut self) -> Result<Strat<D>, StratError> {
        if self.eat('/') {
            let test = self.parse_or::<D>()?;
            self.expect('?', "'?'")?;
            let then = Box::new(self.parse_strat::<D>()?);
            let els = if self.eat(':') {
                Some(Box::new(self.parse_strat::<D>()?))
            } else {
                None
            };
            self.expect(';', "';'")?;
            Ok(Strat::Cond { test, then, els })
        } else if self.eat('(') {
            let strat = self.parse_strat::<D>()?;
            self.expect(')', "')'")?;
            Ok(strat)
        } else {
            self.parse_method::<D>()
        }
    }

    fn parse_method<D: StratDomain>(&mut self) -> Result<Strat<D>, StratError> {
        self.skip_ws();
        let rest = self.rest();

        // longest case-insensitive prefix
        let mut best: Option<usize> = None;
        let mut ambiguous = false;
        for (i, tab) in D::methods().iter().enumerate() {
            let len = tab.name.len();
            if len == 0 || rest.len() < len || !rest.is_char_boundary(len) {
                continue;
            }
            if !rest[..len].eq_ignore_ascii_case(tab.name) {
                continue;
            }
            match best {
                Some(b) if D::methods()[b].name.len() > len => {}
                Some(b) if D::methods()[b].name.len() == len => ambiguous = true,
                _ => {
                    best = Some(i);
                    ambiguous = false;
                }
            }
        }
        let Some(best) = best else {
            return Err(StratError::UnknownMethod { domain: D::NAME, at: self.context() });
        };
        if ambiguous {
            return Err(StratError::AmbiguousMethod { domain: D::NAME, at: self.context() });
        }

        let tab = &D::methods()[best];
        self.pos += tab.name.len();
        let mut meth = (tab.init)();
        if self.eat('{') {
            let saved = self.meth;
            self.meth = (D::NAME, meth.code());
            self.parse_params(&mut meth)?;
            self.meth = saved;
        }
        Ok(Strat::Method(Box::new(meth)))
    }

    fn parse_params<M: StratMethod>(&mut self, meth: &mut M) -> Result<(), StratError> {
        if self.eat('}') {
            return Ok(());
        }
        loop {
            self.skip_ws();
            let name: String =
                self.rest().chars().take_while(|c| c.is_ascii_alphanumeric()).collect();
            if name.is_empty() {
                return Err(self.error_syntax("parameter name"));
            }
            self.pos += name.len();
            self.expect('=', "'='")?;

            let meth_code = meth.code();
            let Some(params) = meth.params_mut() else {
                return Err(self.error_unknown_param(&name));
            };
            let Some(canon) = params.param_names().iter().find(|p| p.eq_ignore_ascii_case(&name))
            else {
                return Err(StratError::UnknownParam {
                    domain: self.meth.0,
                    method: meth_code,
                    name,
                });
            };
            params.parse_param(canon, self)?;

            if !self.eat(',') {
                break;
            }
        }
        self.expect('}', "'}' or ','")
    }

    /* Length of the numeric literal at the start of the remaining text */
    fn number_len(&self, signed: bool) -> (usize, bool) {
        let b = self.rest().as_bytes();
        let digits = |mut i: usize| {
            while i < b.len() && b[i].is_ascii_digit() {
                i += 1;
            }
            i
        };
        let mut i = 0;
        if signed && i < b.len() && (b[i] == b'+' || b[i] == b'-') {
            i += 1;
        }
        let start = i;
        i = digits(i);
        let mut real = false;
        if i < b.len() && b[i] == b'.' {
            real = true;
            i = digits(i + 1);
        }
        if i == start || (real && i == start + 1) {
            return (0, false);
        }
        if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
            let mut j = i + 1;
            if j < b.len() && (b[j] == b'+' || b[j] == b'-') {
                j += 1;
            }
            let k = digits(j);
            if k > j {
                real = true;
                i = k;
            }
        }
        (i, real)
    }

    pub fn parse_int(&mut self) -> Result<Gnum, StratError> {
        self.skip_ws();
        let (len, real) = self.number_len(true);
        if len == 0 || real {
            return Err(StratError::BadNumber { at: self.context() });
        }
        let val = self.rest()[..len]
            .parse()
            .map_err(|_| StratError::BadNumber { at: self.context() })?;
        self.pos += len;
        Ok(val)
    }

    pub fn parse_double(&mut self) -> Result<f64, StratError> {
        self.skip_ws();
        let (len, _) = self.number_len(true);
        if len == 0 {
            return Err(StratError::BadNumber { at: self.context() });
        }
        let val = self.rest()[..len]
            .parse()
            .map_err(|_| StratError::BadNumber { at: self.context() })?;
        self.pos += len;
        Ok(val)
    }

    pub fn parse_case(&mut self) -> Result<char, StratError> {
        match self.peek() {
            Some(c) if c.is_ascii_alphanumeric() => {
                self.pos += 1;
                Ok(c)
            }
            _ => Err(self.error_syntax("case character")),
        }
    }

    fn parse_or<D: StratDomain>(&mut self) -> Result<StratTest<D>, StratError> {
        let mut left = self.parse_and::<D>()?;
        while self.eat('|') {
            left = StratTest::Or(Box::new(left), Box::new(self.parse_and::<D>()?));
        }
        Ok(left)
    }

    fn parse_and<D: StratDomain>(&mut self) -> Result<StratTest<D>, StratError> {
        let mut left = self.parse_not::<D>()?;
        while self.eat('&') {
            left = StratTest::And(Box::new(left), Box::new(self.parse_not::<D>()?));
        }
        Ok(left)
    }

    fn parse_not<D: StratDomain>(&mut self) -> Result<StratTest<D>, StratError> {
        if self.eat('!') {
            return Ok(StratTest::Not(Box::new(self.parse_not::<D>()?)));
        }
        self.parse_rel::<D>()
    }

    fn parse_rel<D: StratDomain>(&mut self) -> Result<StratTest<D>, StratError> {
        let left = self.parse_add::<D>()?;
        let node: fn(Box<StratTest<D>>, Box<StratTest<D>>) -> StratTest<D> = match self.peek() {
            Some('<') => StratTest::Lt,
            Some('=') => StratTest::Eq,
            Some('>') => StratTest::Gt,
            _ => return Ok(left),
        };
        self.pos += 1;
        let right = self.parse_add::<D>()?;
        Ok(node(Box::new(left), Box::new(right)))
    }

    fn parse_add<D: StratDomain>(&mut self) -> Result<StratTest<D>, StratError> {
        let mut left = self.parse_mul::<D>()?;
        loop {
            left = if self.eat('+') {
                StratTest::Add(Box::new(left), Box::new(self.parse_mul::<D>()?))
            } else if self.eat('-') {
                StratTest::Sub(Box::new(left), Box::new(self.parse_mul::<D>()?))
            } else {
                return Ok(left);
            };
        }
    }

    fn parse_mul<D: StratDomain>(&mut self) -> Result<StratTest<D>, StratError> {
        let mut left = self.parse_mod::<D>()?;
        while self.eat('*') {
            left = StratTest::Mul(Box::new(left), Box::new(self.parse_mod::<D>()?));
        }
        Ok(left)
    }

    fn parse_mod<D: StratDomain>(&mut self) -> Result<StratTest<D>, StratError> {
        let mut left = self.parse_prim::<D>()?;
        while self.eat('%') {
            left = StratTest::Mod(Box::new(left), Box::new(self.parse_prim::<D>()?));
        }
        Ok(left)
    }

    fn parse_prim<D: StratDomain>(&mut self) -> Result<StratTest<D>, StratError> {
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                let test = self.parse_or::<D>()?;
                self.expect(')', "')'")?;
                Ok(test)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => {
                let (len, real) = self.number_len(false);
                if len == 0 {
                    return Err(StratError::BadNumber { at: self.context() });
                }
                let text = &self.rest()[..len];
                let val = if real {
                    text.parse().map(StratVal::Dbl).ok()
                } else {
                    text.parse().map(StratVal::Int).ok()
                };
                let val = val.ok_or_else(|| StratError::BadNumber { at: self.context() })?;
                self.pos += len;
                Ok(StratTest::Val(val))
            }
            Some(c) if c.is_ascii_alphabetic() => {
                let name: String =
                    self.rest().chars().take_while(|c| c.is_ascii_alphanumeric()).collect();
                let Some(var) = D::vars().iter().find(|v| v.name.eq_ignore_ascii_case(&name))
                else {
                    return Err(StratError::UnknownVar { domain: D::NAME, name });
                };
                self.pos += name.len();
                Ok(StratTest::Var(var))
            }
            _ => Err(self.error_syntax("test operand")),
        }
    }
}
