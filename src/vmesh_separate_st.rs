//! Mesh separation strategies
//!
//! | method | action |
//! |---|---|
//! | `f` | element-move FM refinement |
//! | `g` | greedy element growing |
//! | `m` | multilevel separation by element and node matching |
//! | `v` | separation of the nodal graph, projected back on the mesh |
//! | `z` | everything in part 0 |

use crate::error::Result;
use crate::strat::{
    ParamSet, Strat, StratDomain, StratMethod, StratMethodTab, StratVal, StratVarTab,
};
use crate::vmesh::Vmesh;
use crate::vmesh_separate_fm::{vmesh_separate_fm, VmeshSeparateFmParam};
use crate::vmesh_separate_gg::{vmesh_separate_gg, VmeshSeparateGgParam};
use crate::vmesh_separate_gr::{vmesh_separate_gr, VmeshSeparateGrParam};
use crate::vmesh_separate_ml::{vmesh_separate_ml, VmeshSeparateMlParam};

/// Strategy domain of mesh separation
pub enum VmeshSeparate {}

#[derive(Clone, Debug)]
pub enum VmeshSeparateMethod {
    Fm(VmeshSeparateFmParam),
    Gg(VmeshSeparateGgParam),
    Ml(VmeshSeparateMlParam),
    Gr(VmeshSeparateGrParam),
    Zr,
}

impl StratMethod for VmeshSeparateMethod {
    fn code(&self) -> &'static str {
        match self {
            VmeshSeparateMethod::Fm(_) => "f",
            VmeshSeparateMethod::Gg(_) => "g",
            VmeshSeparateMethod::Ml(_) => "m",
            VmeshSeparateMethod::Gr(_) => "v",
            VmeshSeparateMethod::Zr => "z",
        }
    }

    fn params(&self) -> Option<&dyn ParamSet> {
        match self {
            VmeshSeparateMethod::Fm(p) => Some(p),
            VmeshSeparateMethod::Gg(p) => Some(p),
            VmeshSeparateMethod::Ml(p) => Some(p),
            VmeshSeparateMethod::Gr(p) => Some(p),
            VmeshSeparateMethod::Zr => None,
        }
    }

    fn params_mut(&mut self) -> Option<&mut dyn ParamSet> {
        match self {
            VmeshSeparateMethod::Fm(p) => Some(p),
            VmeshSeparateMethod::Gg(p) => Some(p),
            VmeshSeparateMethod::Ml(p) => Some(p),
            VmeshSeparateMethod::Gr(p) => Some(p),
            VmeshSeparateMethod::Zr => None,
        }
    }
}

static METHODS: [StratMethodTab<VmeshSeparateMethod>; 5] = [
    StratMethodTab { name: "f", init: || VmeshSeparateMethod::Fm(Default::default()) },
    StratMethodTab { name: "g", init: || VmeshSeparateMethod::Gg(Default::default()) },
    StratMethodTab { name: "m", init: || VmeshSeparateMethod::Ml(Default::default()) },
    StratMethodTab { name: "v", init: || VmeshSeparateMethod::Gr(Default::default()) },
    StratMethodTab { name: "z", init: || VmeshSeparateMethod::Zr },
];

static VARS: [StratVarTab<Vmesh>; 5] = [
    StratVarTab { name: "edge", read: |m| StratVal::Int(m.m.edgenbr) },
    StratVarTab { name: "levl", read: |m| StratVal::Int(m.levlnum) },
    StratVarTab { name: "load", read: |m| StratVal::Int(m.m.vnlosum) },
    StratVarTab { name: "velm", read: |m| StratVal::Int(m.m.velmnbr) },
    StratVarTab { name: "vnod", read: |m| StratVal::Int(m.m.vnodnbr) },
];

impl StratDomain for VmeshSeparate {
    type Method = VmeshSeparateMethod;
    type Data = Vmesh;

    const NAME: &'static str = "mesh separation";

    fn methods() -> &'static [StratMethodTab<VmeshSeparateMethod>] {
        &METHODS
    }

    fn vars() -> &'static [StratVarTab<Vmesh>] {
        &VARS
    }
}

impl VmeshSeparate {
    pub fn grow_refine() -> Strat<VmeshSeparate> {
        Strat::method(VmeshSeparateMethod::Gg(Default::default()))
            .then(Strat::method(VmeshSeparateMethod::Fm(Default::default())))
    }

    pub fn refine() -> Strat<VmeshSeparate> {
        Strat::method(VmeshSeparateMethod::Fm(Default::default()))
    }
}

/// Apply separation strategy `strat` to `meshptr`
pub fn vmesh_separate_st(meshptr: &mut Vmesh, strat: &Strat<VmeshSeparate>) -> Result<()> {
    match strat {
        Strat::Empty => {}
        Strat::Concat(first, second) => {
            vmesh_separate_st(meshptr, first)?;
            vmesh_separate_st(meshptr, second)?;
        }
        Strat::Cond { test, then, els } => {
            if test.check(meshptr)? {
                vmesh_separate_st(meshptr, then)?;
            } else if let Some(els) = els {
                vmesh_separate_st(meshptr, els)?;
            }
        }
        Strat::Select(first, second) => {
            let savetab = meshptr.store();
            vmesh_separate_st(meshptr, first)?;
            let firsttab = meshptr.store();
            meshptr.restore(&savetab);
            vmesh_separate_st(meshptr, second)?;
            if firsttab.quality() < meshptr.quality() {
                meshptr.restore(&firsttab);
            }
        }
        Strat::Method(meth) => {
            match &**meth {
                VmeshSeparateMethod::Fm(p) => vmesh_separate_fm(meshptr, p)?,
                VmeshSeparateMethod::Gg(p) => vmesh_separate_gg(meshptr, p)?,
                VmeshSeparateMethod::Ml(p) => vmesh_separate_ml(meshptr, p)?,
                VmeshSeparateMethod::Gr(p) => vmesh_separate_gr(meshptr, p)?,
                VmeshSeparateMethod::Zr => meshptr.zero(),
            }
            #[cfg(debug_assertions)]
            meshptr.check()?;
        }
    }
    Ok(())
}
