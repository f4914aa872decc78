//! Halo minimum degree and minimum fill ordering of a halo graph

use crate::defs::{Gnum, HALL_COLMAX_DEFAULT, HALL_FILLRAT_DEFAULT};
use crate::error::Result;
use crate::hall_order_hd::{hall_order_hd, HallGraph, HallScore};
use crate::hall_order_hx::hall_order_hx_build;
use crate::hgraph::Hgraph;
use crate::hgraph_order_si::hgraph_order_si;
use crate::order::{Order, OrderCblk};

#[derive(Clone, Debug, StratParams)]
pub struct HgraphOrderHxParam {
    /// minimum column block size
    #[strat(name = "cmin")]
    pub colmin: Gnum,
    /// maximum column block size
    #[strat(name = "cmax")]
    pub colmax: Gnum,
    #[strat(name = "frat")]
    pub fillrat: f64,
}

impl Default for HgraphOrderHxParam {
    fn default() -> Self {
        Self { colmin: 0, colmax: HALL_COLMAX_DEFAULT, fillrat: HALL_FILLRAT_DEFAULT }
    }
}

/// Quotient graph of a halo graph: every vertex is a variable, there are no initial elements
pub(crate) fn hgraph_hall_graph(grafptr: &Hgraph) -> HallGraph {
    let baseval = grafptr.s.baseval;
    HallGraph {
        vnohnbr: grafptr.vnohnbr as usize,
        vartab: grafptr
            .s
            .vert_range()
            .map(|v| grafptr.s.neighbors(v).iter().map(|&u| (u - baseval) as usize).collect())
            .collect(),
        elmtab: Vec::new(),
    }
}

pub fn hgraph_order_hx(
    grafptr: &Hgraph,
    ordeptr: &mut Order,
    ordenum: Gnum,
    cblkptr: &mut OrderCblk,
    paraptr: &HgraphOrderHxParam,
    kind: HallScore,
) -> Result<()> {
    if grafptr.vnohnbr < paraptr.colmin {
        return hgraph_order_si(grafptr, ordeptr, ordenum);
    }
    let ord = hall_order_hd(hgraph_hall_graph(grafptr), kind)?;
    let blocks = hall_order_hx_build(&ord, paraptr.colmin, paraptr.colmax, paraptr.fillrat)?;
    let baseval = grafptr.s.baseval;
    blocks.apply(ordeptr, cblkptr, ordenum, |v| grafptr.s.vnum(baseval + v as Gnum));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::graph_build::{graph_build, Grid2Gen};
    use crate::order::CblkType;

    fn clique(n: Gnum) -> Hgraph {
        let mut verttab = vec![0];
        let mut edgetab = Vec::new();
        for v in 0..n {
            edgetab.extend((0..n).filter(|&u| u != v));
            verttab.push(edgetab.len() as Gnum);
        }
        Hgraph::from_graph(Graph::from_csr(0, verttab, edgetab, None, None).unwrap())
    }

    fn order_with(grafptr: &Hgraph, paraptr: &HgraphOrderHxParam, kind: HallScore) -> Order {
        let mut order = Order::new(grafptr.s.baseval, grafptr.vnohnbr).unwrap();
        let mut root = std::mem::take(&mut order.rootcblk);
        hgraph_order_hx(grafptr, &mut order, grafptr.s.baseval, &mut root, paraptr, kind).unwrap();
        order.rootcblk = root;
        order.check().unwrap();
        order
    }

    #[test]
    fn clique_is_one_column_block() {
        for kind in [HallScore::Degree, HallScore::Fill] {
            for colmin in [0, 5] {
                let paraptr = HgraphOrderHxParam { colmin, ..Default::default() };
                let order = order_with(&clique(5), &paraptr, kind);
                assert_eq!(order.cblknbr, 1);
                assert_eq!(order.rang(), vec![0, 5]);
            }
        }
    }

    #[test]
    fn grid_gives_an_elimination_tree() {
        let grafptr = Hgraph::from_graph(graph_build(1, &mut Grid2Gen::new(6, 5)).unwrap());
        let order = order_with(&grafptr, &HgraphOrderHxParam::default(), HallScore::Fill);
        assert!(order.cblknbr > 1);
        assert_eq!(order.rootcblk.typeval, CblkType::Tree);
        let treetab = order.tree();
        for (i, &f) in treetab.iter().enumerate() {
            assert!(f == -1 || f > 1 + i as Gnum);
        }
    }

    #[test]
    fn small_graphs_fall_back_to_simple() {
        let paraptr = HgraphOrderHxParam { colmin: 10, ..Default::default() };
        let order = order_with(&clique(4), &paraptr, HallScore::Degree);
        assert_eq!(order.peritab.as_slice(), &[0, 1, 2, 3]);
    }
}
