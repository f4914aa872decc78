//! Halo graph ordering strategies
//!
//! | method | action |
//! |---|---|
//! | `b` | apply a strategy, then split large column blocks |
//! | `d` | halo approximate minimum degree |
//! | `f` | halo approximate minimum fill |
//! | `n` | nested dissection |
//! | `s` | simple ordering, in vertex order |
//!
//! Ordering strategies cannot be concatenated nor selected: an ordering writes its ordinals in
//! place and cannot be undone.

use crate::defs::Gnum;
use crate::error::Result;
use crate::hgraph::Hgraph;
use crate::hgraph_order_bl::{hgraph_order_bl, HgraphOrderBlParam};
use crate::hgraph_order_hx::{hgraph_order_hx, HgraphOrderHxParam};
use crate::hgraph_order_nd::{hgraph_order_nd, HgraphOrderNdParam};
use crate::hgraph_order_si::hgraph_order_si;
use crate::hall_order_hd::HallScore;
use crate::order::{Order, OrderCblk};
use crate::strat::{
    ParamSet, Strat, StratDomain, StratError, StratMethod, StratMethodTab, StratVal, StratVarTab,
};

/// Strategy domain of halo graph ordering
pub enum HgraphOrder {}

#[derive(Clone, Debug)]
pub enum HgraphOrderMethod {
    Bl(HgraphOrderBlParam),
    Hd(HgraphOrderHxParam),
    Hf(HgraphOrderHxParam),
    Nd(HgraphOrderNdParam),
    Si,
}

impl StratMethod for HgraphOrderMethod {
    fn code(&self) -> &'static str {
        match self {
            HgraphOrderMethod::Bl(_) => "b",
            HgraphOrderMethod::Hd(_) => "d",
            HgraphOrderMethod::Hf(_) => "f",
            HgraphOrderMethod::Nd(_) => "n",
            HgraphOrderMethod::Si => "s",
        }
    }

    fn params(&self) -> Option<&dyn ParamSet> {
        match self {
            HgraphOrderMethod::Bl(p) => Some(p),
            HgraphOrderMethod::Hd(p) | HgraphOrderMethod::Hf(p) => Some(p),
            HgraphOrderMethod::Nd(p) => Some(p),
            HgraphOrderMethod::Si => None,
        }
    }

    fn params_mut(&mut self) -> Option<&mut dyn ParamSet> {
        match self {
            HgraphOrderMethod::Bl(p) => Some(p),
            HgraphOrderMethod::Hd(p) | HgraphOrderMethod::Hf(p) => Some(p),
            HgraphOrderMethod::Nd(p) => Some(p),
            HgraphOrderMethod::Si => None,
        }
    }
}

static METHODS: [StratMethodTab<HgraphOrderMethod>; 5] = [
    StratMethodTab { name: "b", init: || HgraphOrderMethod::Bl(Default::default()) },
    StratMethodTab { name: "d", init: || HgraphOrderMethod::Hd(Default::default()) },
    StratMethodTab { name: "f", init: || HgraphOrderMethod::Hf(Default::default()) },
    StratMethodTab { name: "n", init: || HgraphOrderMethod::Nd(Default::default()) },
    StratMethodTab { name: "s", init: || HgraphOrderMethod::Si },
];

static VARS: [StratVarTab<Hgraph>; 5] = [
    StratVarTab { name: "edge", read: |g| StratVal::Int(g.enohnbr) },
    StratVarTab { name: "levl", read: |g| StratVal::Int(g.levlnum) },
    StratVarTab { name: "load", read: |g| StratVal::Int(g.vnlosum) },
    StratVarTab { name: "mdeg", read: |g| StratVal::Int(g.s.degrmax) },
    StratVarTab { name: "vert", read: |g| StratVal::Int(g.vnohnbr) },
];

impl StratDomain for HgraphOrder {
    type Method = HgraphOrderMethod;
    type Data = Hgraph;

    const NAME: &'static str = "graph ordering";

    fn methods() -> &'static [StratMethodTab<HgraphOrderMethod>] {
        &METHODS
    }

    fn vars() -> &'static [StratVarTab<Hgraph>] {
        &VARS
    }
}

impl HgraphOrder {
    pub fn simple() -> Strat<HgraphOrder> {
        Strat::method(HgraphOrderMethod::Si)
    }

    pub fn min_fill() -> Strat<HgraphOrder> {
        Strat::method(HgraphOrderMethod::Hf(Default::default()))
    }
}

/*************************************************************************/
/* Order the non-halo vertices of `grafptr` with strategy `strat`. The
   ordinals `ordenum..ordenum + vnohnbr` are written in the inverse
   permutation of `ordeptr`, and leaf `cblkptr` is refined. */
/*************************************************************************/
pub fn hgraph_order_st(
    grafptr: &Hgraph,
    ordeptr: &mut Order,
    ordenum: Gnum,
    cblkptr: &mut OrderCblk,
    strat: &Strat<HgraphOrder>,
) -> Result<()> {
    match strat {
        Strat::Empty => hgraph_order_si(grafptr, ordeptr, ordenum),
        Strat::Concat(..) => Err(StratError::Unsupported {
            domain: HgraphOrder::NAME,
            what: "concatenation",
        }
        .into()),
        Strat::Select(..) => {
            Err(StratError::Unsupported { domain: HgraphOrder::NAME, what: "selection" }.into())
        }
        Strat::Cond { test, then, els } => {
            if test.check(grafptr)? {
                hgraph_order_st(grafptr, ordeptr, ordenum, cblkptr, then)
            } else {
                match els {
                    Some(els) => hgraph_order_st(grafptr, ordeptr, ordenum, cblkptr, els),
                    None => hgraph_order_si(grafptr, ordeptr, ordenum),
                }
            }
        }
        Strat::Method(meth) => match &**meth {
            HgraphOrderMethod::Bl(p) => hgraph_order_bl(grafptr, ordeptr, ordenum, cblkptr, p),
            HgraphOrderMethod::Hd(p) => {
                hgraph_order_hx(grafptr, ordeptr, ordenum, cblkptr, p, HallScore::Degree)
            }
            HgraphOrderMethod::Hf(p) => {
                hgraph_order_hx(grafptr, ordeptr, ordenum, cblkptr, p, HallScore::Fill)
            }
            HgraphOrderMethod::Nd(p) => hgraph_order_nd(grafptr, ordeptr, ordenum, cblkptr, p),
            HgraphOrderMethod::Si => hgraph_order_si(grafptr, ordeptr, ordenum),
        },
    }
}
