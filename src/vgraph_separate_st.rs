//! Graph separation strategies
//!
//! | method | action |
//! |---|---|
//! | `f` | vertex FM refinement |
//! | `g` | greedy graph growing |
//! | `m` | multilevel separation |
//! | `t` | separator thinning |
//! | `z` | zero separation, everything in part 0 |

use crate::error::Result;
use crate::strat::{
    ParamSet, Strat, StratDomain, StratMethod, StratMethodTab, StratVal, StratVarTab,
};
use crate::vgraph::Vgraph;
use crate::vgraph_separate_fm::{vgraph_separate_fm, VgraphSeparateFmParam};
use crate::vgraph_separate_gg::{vgraph_separate_gg, VgraphSeparateGgParam};
use crate::vgraph_separate_ml::{vgraph_separate_ml, VgraphSeparateMlParam};
use crate::vgraph_separate_th::vgraph_separate_th;

/// Strategy domain of graph separation
pub enum VgraphSeparate {}

#[derive(Clone, Debug)]
pub enum VgraphSeparateMethod {
    Fm(VgraphSeparateFmParam),
    Gg(VgraphSeparateGgParam),
    Ml(VgraphSeparateMlParam),
    Th,
    Zr,
}

impl StratMethod for VgraphSeparateMethod {
    fn code(&self) -> &'static str {
        match self {
            VgraphSeparateMethod::Fm(_) => "f",
            VgraphSeparateMethod::Gg(_) => "g",
            VgraphSeparateMethod::Ml(_) => "m",
            VgraphSeparateMethod::Th => "t",
            VgraphSeparateMethod::Zr => "z",
        }
    }

    fn params(&self) -> Option<&dyn ParamSet> {
        match self {
            VgraphSeparateMethod::Fm(p) => Some(p),
            VgraphSeparateMethod::Gg(p) => Some(p),
            VgraphSeparateMethod::Ml(p) => Some(p),
            _ => None,
        }
    }

    fn params_mut(&mut self) -> Option<&mut dyn ParamSet> {
        match self {
            VgraphSeparateMethod::Fm(p) => Some(p),
            VgraphSeparateMethod::Gg(p) => Some(p),
            VgraphSeparateMethod::Ml(p) => Some(p),
            _ => None,
        }
    }
}

static METHODS: [StratMethodTab<VgraphSeparateMethod>; 5] = [
    StratMethodTab { name: "f", init: || VgraphSeparateMethod::Fm(Default::default()) },
    StratMethodTab { name: "g", init: || VgraphSeparateMethod::Gg(Default::default()) },
    StratMethodTab { name: "m", init: || VgraphSeparateMethod::Ml(Default::default()) },
    StratMethodTab { name: "t", init: || VgraphSeparateMethod::Th },
    StratMethodTab { name: "z", init: || VgraphSeparateMethod::Zr },
];

static VARS: [StratVarTab<Vgraph>; 4] = [
    StratVarTab { name: "edge", read: |g| StratVal::Int(g.s.edgenbr) },
    StratVarTab { name: "levl", read: |g| StratVal::Int(g.levlnum) },
    StratVarTab { name: "load", read: |g| StratVal::Int(g.s.velosum) },
    StratVarTab { name: "vert", read: |g| StratVal::Int(g.s.vertnbr) },
];

impl StratDomain for VgraphSeparate {
    type Method = VgraphSeparateMethod;
    type Data = Vgraph;

    const NAME: &'static str = "graph separation";

    fn methods() -> &'static [StratMethodTab<VgraphSeparateMethod>] {
        &METHODS
    }

    fn vars() -> &'static [StratVarTab<Vgraph>] {
        &VARS
    }
}

impl VgraphSeparate {
    /// Greedy growing followed by FM refinement
    pub fn grow_refine() -> Strat<VgraphSeparate> {
        Strat::method(VgraphSeparateMethod::Gg(Default::default()))
            .then(Strat::method(VgraphSeparateMethod::Fm(Default::default())))
    }

    pub fn refine() -> Strat<VgraphSeparate> {
        Strat::method(VgraphSeparateMethod::Fm(Default::default()))
    }
}

/// Apply separation strategy `strat` to `grafptr`
pub fn vgraph_separate_st(grafptr: &mut Vgraph, strat: &Strat<VgraphSeparate>) -> Result<()> {
    match strat {
        Strat::Empty => {}
        Strat::Concat(first, second) => {
            vgraph_separate_st(grafptr, first)?;
            vgraph_separate_st(grafptr, second)?;
        }
        Strat::Cond { test, then, els } => {
            if test.check(grafptr)? {
                vgraph_separate_st(grafptr, then)?;
            } else if let Some(els) = els {
                vgraph_separate_st(grafptr, els)?;
            }
        }
        Strat::Select(first, second) => {
            let savetab = grafptr.store();
            vgraph_separate_st(grafptr, first)?;
            let firsttab = grafptr.store();
            grafptr.restore(&savetab);
            vgraph_separate_st(grafptr, second)?;
            if firsttab.quality() < grafptr.quality() {
                grafptr.restore(&firsttab);
            }
        }
        Strat::Method(meth) => {
            match &**meth {
                VgraphSeparateMethod::Fm(p) => vgraph_separate_fm(grafptr, p)?,
                VgraphSeparateMethod::Gg(p) => vgraph_separate_gg(grafptr, p)?,
                VgraphSeparateMethod::Ml(p) => vgraph_separate_ml(grafptr, p)?,
                VgraphSeparateMethod::Th => vgraph_separate_th(grafptr),
                VgraphSeparateMethod::Zr => grafptr.zero(),
            }
            #[cfg(debug_assertions)]
            grafptr.check()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_build::{graph_build, Grid2Gen};

    fn grid(dimx: i64, dimy: i64) -> Vgraph {
        Vgraph::new(graph_build(0, &mut Grid2Gen::new(dimx, dimy)).unwrap()).unwrap()
    }

    #[test]
    fn method_round_trip() {
        for text in [
            "f{move=80,pass=4,bal=0.2}",
            "g{pass=3}",
            "m{vert=50,rat=0.7,type=r,low=g{pass=10}f{move=80,pass=4,bal=0.2},asc=f}",
            "t",
            "z",
        ] {
            let strat = Strat::<VgraphSeparate>::parse(text).unwrap();
            let saved = strat.save();
            assert_eq!(Strat::<VgraphSeparate>::parse(&saved).unwrap().save(), saved);
            assert_eq!(saved.chars().next(), text.chars().next());
        }
    }

    #[test]
    fn select_keeps_the_smaller_separator() {
        let mut vgraf = grid(6, 6);
        let strat = Strat::<VgraphSeparate>::parse("z|g{pass=2}f").unwrap();
        vgraph_separate_st(&mut vgraf, &strat).unwrap();
        vgraf.check().unwrap();
        // zero separation has an empty separator
        assert_eq!(vgraf.compload[2], 0);
        assert_eq!(vgraf.compsize[1], 0);

        let mut vgraf = grid(6, 6);
        let strat = Strat::<VgraphSeparate>::parse("g{pass=2}f|g{pass=1}").unwrap();
        vgraph_separate_st(&mut vgraf, &strat).unwrap();
        vgraf.check().unwrap();
        assert!(vgraf.compsize[0] > 0 && vgraf.compsize[1] > 0);
    }

    #[test]
    fn conditions_read_the_graph() {
        let strat = Strat::<VgraphSeparate>::parse("/vert>100?g f;").unwrap();
        let mut vgraf = grid(5, 5);
        vgraph_separate_st(&mut vgraf, &strat).unwrap();
        assert_eq!(vgraf.compsize[1], 0);
        let mut vgraf = grid(11, 11);
        vgraph_separate_st(&mut vgraf, &strat).unwrap();
        vgraf.check().unwrap();
        assert!(vgraf.compsize[1] > 0);
    }
}
