//! Target architectures
//!
//! A target architecture is queried through domains: sets of terminals that can be split in two
//! until single terminals remain. Only the complete graph architecture is provided, in which
//! every terminal is at distance 1 from every other one.

use std::fmt::Debug;
use std::io::BufRead;

use crate::defs::Gnum;
use crate::error::{invalid, Result, ScotchError};

pub trait Arch {
    type Dom: Clone + Debug + PartialEq;

    /// Domain holding every terminal
    fn dom_first(&self) -> Self::Dom;
    /// Number of terminals in `dom`
    fn dom_size(&self, dom: &Self::Dom) -> Gnum;
    /// Computing weight of `dom`
    fn dom_weight(&self, dom: &Self::Dom) -> Gnum;
    /// Smallest terminal number of `dom`
    fn dom_num(&self, dom: &Self::Dom) -> Gnum;
    /// Domain of the single terminal `termnum`
    fn dom_term(&self, termnum: Gnum) -> Result<Self::Dom>;
    /// Split `dom` in two, or `None` for a single terminal
    fn dom_bipart(&self, dom: &Self::Dom) -> Option<(Self::Dom, Self::Dom)>;
    fn dom_distance(&self, dom0: &Self::Dom, dom1: &Self::Dom) -> Gnum;
}

/// Complete graph of `numnbr` unit-weight terminals
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArchCmplt {
    pub numnbr: Gnum,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArchCmpltDom {
    pub nummin: Gnum,
    pub numnbr: Gnum,
}

impl ArchCmplt {
    pub fn new(numnbr: Gnum) -> Result<ArchCmplt> {
        if numnbr < 1 {
            invalid!("complete graph architecture needs at least one terminal, got {numnbr}");
        }
        Ok(ArchCmplt { numnbr })
    }

    /// Read an architecture description: `cmplt` followed by the number of terminals
    pub fn load(reader: impl BufRead) -> Result<ArchCmplt> {
        let mut words = Vec::new();
        for line in reader.lines() {
            let line = line?;
            words.extend(line.split_whitespace().map(str::to_owned));
        }
        match words.as_slice() {
            [name, num] if name.eq_ignore_ascii_case("cmplt") => {
                let numnbr = num.parse::<Gnum>().map_err(|_| ScotchError::Parse {
                    line: 1,
                    msg: format!("invalid terminal count '{num}'"),
                })?;
                ArchCmplt::new(numnbr)
            }
            [name, ..] => invalid!("unsupported architecture '{name}'"),
            [] => invalid!("empty architecture description"),
        }
    }
}

impl Arch for ArchCmplt {
    type Dom = ArchCmpltDom;

    fn dom_first(&self) -> ArchCmpltDom {
        ArchCmpltDom { nummin: 0, numnbr: self.numnbr }
    }

    fn dom_size(&self, dom: &ArchCmpltDom) -> Gnum {
        dom.numnbr
    }

    fn dom_weight(&self, dom: &ArchCmpltDom) -> Gnum {
        dom.numnbr
    }

    fn dom_num(&self, dom: &ArchCmpltDom) -> Gnum {
        dom.nummin
    }

    fn dom_term(&self, termnum: Gnum) -> Result<ArchCmpltDom> {
        if termnum < 0 || termnum >= self.numnbr {
            invalid!("terminal {termnum} out of range 0..{}", self.numnbr);
        }
        Ok(ArchCmpltDom { nummin: termnum, numnbr: 1 })
    }

    fn dom_bipart(&self, dom: &ArchCmpltDom) -> Option<(ArchCmpltDom, ArchCmpltDom)> {
        if dom.numnbr <= 1 {
            return None;
        }
        let numnbr0 = (dom.numnbr + 1) / 2;
        Some((
            ArchCmpltDom { nummin: dom.nummin, numnbr: numnbr0 },
            ArchCmpltDom { nummin: dom.nummin + numnbr0, numnbr: dom.numnbr - numnbr0 },
        ))
    }

    fn dom_distance(&self, dom0: &ArchCmpltDom, dom1: &ArchCmpltDom) -> Gnum {
        if dom0 == dom1 {
            0
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Terminals reached by splitting `dom` down to single terminals
    fn leaves(arch: &ArchCmplt, dom: &ArchCmpltDom, out: &mut Vec<Gnum>) {
        match arch.dom_bipart(dom) {
            None => out.push(arch.dom_num(dom)),
            Some((d0, d1)) => {
                assert_eq!(arch.dom_size(&d0) + arch.dom_size(&d1), arch.dom_size(dom));
                leaves(arch, &d0, out);
                leaves(arch, &d1, out);
            }
        }
    }

    #[test]
    fn bipartition_reaches_every_terminal() {
        let arch = ArchCmplt::new(7).unwrap();
        let mut out = Vec::new();
        leaves(&arch, &arch.dom_first(), &mut out);
        assert_eq!(out, (0..7).collect::<Vec<_>>());
        let (d0, d1) = arch.dom_bipart(&arch.dom_first()).unwrap();
        assert_eq!((d0.numnbr, d1.numnbr), (4, 3));
        assert_eq!(arch.dom_distance(&d0, &d0), 0);
        assert_eq!(arch.dom_distance(&d0, &d1), 1);
    }

    #[test]
    fn bounds_are_checked() {
        assert!(ArchCmplt::new(0).is_err());
        let arch = ArchCmplt::new(3).unwrap();
        assert!(arch.dom_term(3).is_err());
        assert_eq!(arch.dom_term(2).unwrap(), ArchCmpltDom { nummin: 2, numnbr: 1 });
    }

    #[test]
    fn loads_a_description() {
        let arch = ArchCmplt::load("cmplt\n5\n".as_bytes()).unwrap();
        assert_eq!(arch.numnbr, 5);
        assert!(ArchCmplt::load("mesh2D 2 2".as_bytes()).is_err());
        assert!(ArchCmplt::load("cmplt x".as_bytes()).is_err());
    }
}
