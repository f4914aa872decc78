//! Halo mesh ordering strategies
//!
//! | method | action |
//! |---|---|
//! | `b` | apply a strategy, then split large column blocks |
//! | `d` | halo approximate minimum degree on the element/node quotient graph |
//! | `f` | halo approximate minimum fill on the element/node quotient graph |
//! | `n` | nested dissection by mesh separation |
//! | `s` | simple ordering, in node order |
//! | `v` | order the nodal graph with a graph ordering strategy |
//!
//! Only the non-halo nodes are ordered.

use crate::defs::Gnum;
use crate::error::Result;
use crate::hall_order_hd::HallScore;
use crate::hgraph_order_hx::HgraphOrderHxParam;
use crate::hmesh::Hmesh;
use crate::hmesh_order_bl::{hmesh_order_bl, HmeshOrderBlParam};
use crate::hmesh_order_gr::{hmesh_order_gr, HmeshOrderGrParam};
use crate::hmesh_order_hx::hmesh_order_hx;
use crate::hmesh_order_nd::{hmesh_order_nd, HmeshOrderNdParam};
use crate::hmesh_order_si::hmesh_order_si;
use crate::order::{Order, OrderCblk};
use crate::strat::{
    ParamSet, Strat, StratDomain, StratError, StratMethod, StratMethodTab, StratVal, StratVarTab,
};

/// Strategy domain of halo mesh ordering
pub enum HmeshOrder {}

#[derive(Clone, Debug)]
pub enum HmeshOrderMethod {
    Bl(HmeshOrderBlParam),
    Hd(HgraphOrderHxParam),
    Hf(HgraphOrderHxParam),
    Nd(HmeshOrderNdParam),
    Si,
    Gr(HmeshOrderGrParam),
}

impl StratMethod for HmeshOrderMethod {
    fn code(&self) -> &'static str {
        match self {
            HmeshOrderMethod::Bl(_) => "b",
            HmeshOrderMethod::Hd(_) => "d",
            HmeshOrderMethod::Hf(_) => "f",
            HmeshOrderMethod::Nd(_) => "n",
            HmeshOrderMethod::Si => "s",
            HmeshOrderMethod::Gr(_) => "v",
        }
    }

    fn params(&self) -> Option<&dyn ParamSet> {
        match self {
            HmeshOrderMethod::Bl(p) => Some(p),
            HmeshOrderMethod::Hd(p) | HmeshOrderMethod::Hf(p) => Some(p),
            HmeshOrderMethod::Nd(p) => Some(p),
            HmeshOrderMethod::Si => None,
            HmeshOrderMethod::Gr(p) => Some(p),
        }
    }

    fn params_mut(&mut self) -> Option<&mut dyn ParamSet> {
        match self {
            HmeshOrderMethod::Bl(p) => Some(p),
            HmeshOrderMethod::Hd(p) | HmeshOrderMethod::Hf(p) => Some(p),
            HmeshOrderMethod::Nd(p) => Some(p),
            HmeshOrderMethod::Si => None,
            HmeshOrderMethod::Gr(p) => Some(p),
        }
    }
}

static METHODS: [StratMethodTab<HmeshOrderMethod>; 6] = [
    StratMethodTab { name: "b", init: || HmeshOrderMethod::Bl(Default::default()) },
    StratMethodTab { name: "d", init: || HmeshOrderMethod::Hd(Default::default()) },
    StratMethodTab { name: "f", init: || HmeshOrderMethod::Hf(Default::default()) },
    StratMethodTab { name: "n", init: || HmeshOrderMethod::Nd(Default::default()) },
    StratMethodTab { name: "s", init: || HmeshOrderMethod::Si },
    StratMethodTab { name: "v", init: || HmeshOrderMethod::Gr(Default::default()) },
];

static VARS: [StratVarTab<Hmesh>; 6] = [
    StratVarTab { name: "edge", read: |m| StratVal::Int(m.enohnbr) },
    StratVarTab { name: "levl", read: |m| StratVal::Int(m.levlnum) },
    StratVarTab { name: "load", read: |m| StratVal::Int(m.vnhlsum) },
    StratVarTab { name: "mdeg", read: |m| StratVal::Int(m.m.degrmax) },
    StratVarTab { name: "velm", read: |m| StratVal::Int(m.m.velmnbr) },
    StratVarTab { name: "vnod", read: |m| StratVal::Int(m.vnohnbr) },
];

impl StratDomain for HmeshOrder {
    type Method = HmeshOrderMethod;
    type Data = Hmesh;

    const NAME: &'static str = "mesh ordering";

    fn methods() -> &'static [StratMethodTab<HmeshOrderMethod>] {
        &METHODS
    }

    fn vars() -> &'static [StratVarTab<Hmesh>] {
        &VARS
    }
}

impl HmeshOrder {
    pub fn simple() -> Strat<HmeshOrder> {
        Strat::method(HmeshOrderMethod::Si)
    }

    pub fn min_fill() -> Strat<HmeshOrder> {
        Strat::method(HmeshOrderMethod::Hf(Default::default()))
    }
}

/*************************************************************************/
/* Order the non-halo nodes of `meshptr` with strategy `strat`, writing
   ordinals `ordenum..ordenum + vnohnbr` and refining leaf `cblkptr`. */
/*************************************************************************/
pub fn hmesh_order_st(
    meshptr: &Hmesh,
    ordeptr: &mut Order,
    ordenum: Gnum,
    cblkptr: &mut OrderCblk,
    strat: &Strat<HmeshOrder>,
) -> Result<()> {
    match strat {
        Strat::Empty => hmesh_order_si(meshptr, ordeptr, ordenum),
        Strat::Concat(..) => Err(StratError::Unsupported {
            domain: HmeshOrder::NAME,
            what: "concatenation",
        }
        .into()),
        Strat::Select(..) => {
            Err(StratError::Unsupported { domain: HmeshOrder::NAME, what: "selection" }.into())
        }
        Strat::Cond { test, then, els } => {
            if test.check(meshptr)? {
                hmesh_order_st(meshptr, ordeptr, ordenum, cblkptr, then)
            } else {
                match els {
                    Some(els) => hmesh_order_st(meshptr, ordeptr, ordenum, cblkptr, els),
                    None => hmesh_order_si(meshptr, ordeptr, ordenum),
                }
            }
        }
        Strat::Method(meth) => match &**meth {
            HmeshOrderMethod::Bl(p) => hmesh_order_bl(meshptr, ordeptr, ordenum, cblkptr, p),
            HmeshOrderMethod::Hd(p) => {
                hmesh_order_hx(meshptr, ordeptr, ordenum, cblkptr, p, HallScore::Degree)
            }
            HmeshOrderMethod::Hf(p) => {
                hmesh_order_hx(meshptr, ordeptr, ordenum, cblkptr, p, HallScore::Fill)
            }
            HmeshOrderMethod::Nd(p) => hmesh_order_nd(meshptr, ordeptr, ordenum, cblkptr, p),
            HmeshOrderMethod::Si => hmesh_order_si(meshptr, ordeptr, ordenum),
            HmeshOrderMethod::Gr(p) => hmesh_order_gr(meshptr, ordeptr, ordenum, cblkptr, p),
        },
    }
}
