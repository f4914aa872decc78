//! Mesh separation through the nodal graph
//!
//! The nodal graph is separated with a graph strategy. Every element takes the part of its first
//! node outside the separator, and node parts are then derived from element parts.

use crate::error::Result;
use crate::strat::Strat;
use crate::vgraph::Vgraph;
use crate::vgraph_separate_st::{vgraph_separate_st, VgraphSeparate};
use crate::vmesh::Vmesh;

#[derive(Clone, Debug, StratParams)]
pub struct VmeshSeparateGrParam {
    /// graph separation strategy
    #[strat(name = "strat")]
    pub stratptr: Strat<VgraphSeparate>,
}

impl Default for VmeshSeparateGrParam {
    fn default() -> Self {
        Self { stratptr: VgraphSeparate::grow_refine() }
    }
}

pub fn vmesh_separate_gr(meshptr: &mut Vmesh, paraptr: &VmeshSeparateGrParam) -> Result<()> {
    let mut grafdat = Vgraph::new(meshptr.m.nodal_graph()?)?;
    grafdat.levlnum = meshptr.levlnum;
    vgraph_separate_st(&mut grafdat, &paraptr.stratptr)?;

    let nodeoff = grafdat.s.baseval - meshptr.m.vnodbas;
    for e in meshptr.m.elem_range() {
        let part = meshptr
            .m
            .neighbors(e)
            .iter()
            .map(|&n| grafdat.parttax[n + nodeoff])
            .find(|&p| p != 2)
            .unwrap_or(0);
        meshptr.parttax[e] = part;
    }
    meshptr.update_nodes();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::Gnum;
    use crate::mesh::Mesh;

    #[test]
    fn projects_a_nodal_separator() {
        let mut vmesh = Vmesh::new(Mesh::grid2(1, 8, 8).unwrap()).unwrap();
        vmesh_separate_gr(&mut vmesh, &VmeshSeparateGrParam::default()).unwrap();
        vmesh.check().unwrap();
        assert!(vmesh.ecmpsize[0] > 0 && vmesh.ecmpsize[1] > 0);
        assert!(vmesh.ncmpload[2] > 0);
        let loadsum: Gnum = vmesh.ncmpload.iter().sum();
        assert_eq!(loadsum, vmesh.m.vnlosum);
    }

    #[test]
    fn empty_graph_strategy_keeps_one_part() {
        let mut vmesh = Vmesh::new(Mesh::grid2(0, 3, 3).unwrap()).unwrap();
        let paraptr = VmeshSeparateGrParam { stratptr: Strat::parse("z").unwrap() };
        vmesh_separate_gr(&mut vmesh, &paraptr).unwrap();
        vmesh.check().unwrap();
        assert_eq!(vmesh.ecmpsize, [9, 0]);
        assert_eq!(vmesh.ncmpload[2], 0);
    }
}
