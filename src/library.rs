//! Library entry points
//!
//! Order a whole graph or mesh with a strategy. The default strategies separate with the
//! multilevel method while the structure is large, and order the leaves by halo minimum fill.

use log::info;

use crate::error::Result;
use crate::graph::Graph;
use crate::hgraph::Hgraph;
use crate::hgraph_order_st::{hgraph_order_st, HgraphOrder};
use crate::hmesh::Hmesh;
use crate::hmesh_order_st::{hmesh_order_st, HmeshOrder};
use crate::mesh::Mesh;
use crate::order::Order;
use crate::strat::Strat;

pub const STRAT_GRAPH_ORDER_DEFAULT: &str =
    "n{sep=/(vert>120)?m{vert=100,low=g,asc=f};,ole=f{cmin=0,cmax=100000,frat=0.08},ose=s}";

pub const STRAT_MESH_ORDER_DEFAULT: &str =
    "n{sep=/(vnod>120)?m{vnod=100,low=g,asc=f};,ole=f{cmin=0,cmax=100000,frat=0.08},ose=s}";

pub fn graph_order_strat_default() -> Result<Strat<HgraphOrder>> {
    Ok(Strat::parse(STRAT_GRAPH_ORDER_DEFAULT)?)
}

pub fn mesh_order_strat_default() -> Result<Strat<HmeshOrder>> {
    Ok(Strat::parse(STRAT_MESH_ORDER_DEFAULT)?)
}

/// Order the vertices of `graf`; ordinals and vertex numbers share the base of the graph
pub fn graph_order(graf: &Graph, strat: &Strat<HgraphOrder>) -> Result<Order> {
    let grafptr = Hgraph::from_graph(graf.clone());
    let mut ordedat = Order::new(graf.baseval, graf.vertnbr)?;
    let mut rootcblk = std::mem::take(&mut ordedat.rootcblk);
    let o = hgraph_order_st(&grafptr, &mut ordedat, graf.baseval, &mut rootcblk, strat);
    ordedat.rootcblk = rootcblk;
    o?;
    ordedat.check()?;
    info!(
        "ordered {} vertices: {} column blocks, {} tree nodes",
        ordedat.vnodnbr, ordedat.cblknbr, ordedat.treenbr
    );
    Ok(ordedat)
}

/// Order the nodes of `mesh`
pub fn mesh_order(mesh: &Mesh, strat: &Strat<HmeshOrder>) -> Result<Order> {
    let meshptr = Hmesh::from_mesh(mesh.clone());
    let mut ordedat = Order::new(mesh.baseval, mesh.vnodnbr)?;
    let mut rootcblk = std::mem::take(&mut ordedat.rootcblk);
    let o = hmesh_order_st(&meshptr, &mut ordedat, mesh.baseval, &mut rootcblk, strat);
    ordedat.rootcblk = rootcblk;
    o?;
    ordedat.check()?;
    info!(
        "ordered {} nodes: {} column blocks, {} tree nodes",
        ordedat.vnodnbr, ordedat.cblknbr, ordedat.treenbr
    );
    Ok(ordedat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_build::{graph_build, Grid2Gen};
    use crate::order::CblkType;

    #[test]
    fn default_strategies_parse() {
        let strat = graph_order_strat_default().unwrap();
        assert_eq!(Strat::<HgraphOrder>::parse(&strat.save()).unwrap().save(), strat.save());
        let strat = mesh_order_strat_default().unwrap();
        assert_eq!(Strat::<HmeshOrder>::parse(&strat.save()).unwrap().save(), strat.save());
    }

    #[test]
    fn orders_a_large_grid_by_default() {
        let graf = graph_build(1, &mut Grid2Gen::new(16, 16)).unwrap();
        let order = graph_order(&graf, &graph_order_strat_default().unwrap()).unwrap();
        assert_eq!(order.rootcblk.typeval, CblkType::Nested);
        assert_eq!(order.rang().last(), Some(&257));
    }

    #[test]
    fn orders_a_mesh_by_default() {
        let mesh = Mesh::grid2(0, 12, 12).unwrap();
        let order = mesh_order(&mesh, &mesh_order_strat_default().unwrap()).unwrap();
        assert_eq!(order.vnodnbr, 169);
        assert_eq!(order.rootcblk.typeval, CblkType::Nested);
    }
}
