//! Nested dissection ordering of a halo graph
//!
//! The non-halo part of the graph is separated into two parts and a separator. The separator is
//! ordered last with the separator strategy, and both parts are ordered first by recursion, each
//! part keeping the separator and its previous halo as its own halo. When the separation leaves
//! one part empty, the graph is ordered as a leaf.

use log::debug;

use crate::defs::Gnum;
use crate::error::Result;
use crate::graph::VertList;
use crate::hgraph::Hgraph;
use crate::hgraph_order_st::{hgraph_order_st, HgraphOrder};
use crate::order::{CblkType, Order, OrderCblk};
use crate::strat::Strat;
use crate::vgraph::Vgraph;
use crate::vgraph_separate_st::{vgraph_separate_st, VgraphSeparate, VgraphSeparateMethod};

#[derive(Clone, Debug, StratParams)]
pub struct HgraphOrderNdParam {
    /// separation strategy
    #[strat(name = "sep")]
    pub sepstrat: Strat<VgraphSeparate>,
    /// ordering strategy of leaves
    #[strat(name = "ole")]
    pub ordstratlea: Strat<HgraphOrder>,
    /// ordering strategy of separators
    #[strat(name = "ose")]
    pub ordstratsep: Strat<HgraphOrder>,
}

impl Default for HgraphOrderNdParam {
    fn default() -> Self {
        Self {
            sepstrat: Strat::method(VgraphSeparateMethod::Ml(Default::default())),
            ordstratlea: HgraphOrder::min_fill(),
            ordstratsep: HgraphOrder::simple(),
        }
    }
}

pub fn hgraph_order_nd(
    grafptr: &Hgraph,
    ordeptr: &mut Order,
    ordenum: Gnum,
    cblkptr: &mut OrderCblk,
    paraptr: &HgraphOrderNdParam,
) -> Result<()> {
    if grafptr.vnohnbr == 0 {
        return Ok(());
    }

    let mut vspgrafdat = Vgraph::new(grafptr.unhalo()?)?;
    vspgrafdat.levlnum = grafptr.levlnum;
    vgraph_separate_st(&mut vspgrafdat, &paraptr.sepstrat)?;
    debug!(
        "level {}: parts {} / {}, separator {} (load {})",
        grafptr.levlnum,
        vspgrafdat.compsize[0],
        vspgrafdat.compsize[1],
        vspgrafdat.fronnbr,
        vspgrafdat.compload[2]
    );

    if vspgrafdat.compsize[0] == 0 || vspgrafdat.compsize[1] == 0 {
        drop(vspgrafdat);
        return hgraph_order_st(grafptr, ordeptr, ordenum, cblkptr, &paraptr.ordstratlea);
    }

    let range = grafptr.vnoh_range();
    let vsplisttab = [
        VertList::from_part(&vspgrafdat.parttax, range.clone(), 0),
        VertList::from_part(&vspgrafdat.parttax, range.clone(), 1),
        VertList::from_part(&vspgrafdat.parttax, range, 2),
    ];
    drop(vspgrafdat);
    let [n0, n1, n2] = vsplisttab.each_ref().map(|l| l.len() as Gnum);

    if n2 > 0 {
        ordeptr.split(cblkptr, CblkType::Nested, &[n0, n1, n2]);
    } else {
        ordeptr.split(cblkptr, CblkType::Nested, &[n0, n1]);
    }

    let halonbr = grafptr.s.vertnbr - grafptr.vnohnbr;
    if n2 > 0 {
        let indgrafdat = grafptr.induce_list(&vsplisttab[2], grafptr.vnohnbr - n2 + halonbr)?;
        hgraph_order_st(
            &indgrafdat,
            ordeptr,
            ordenum + n0 + n1,
            &mut cblkptr.cblktab[2],
            &paraptr.ordstratsep,
        )?;
    }

    let mut partnum = ordenum;
    for (i, list) in vsplisttab[..2].iter().enumerate() {
        let indgrafdat = grafptr.induce_list(list, n2 + halonbr)?;
        hgraph_order_nd(&indgrafdat, ordeptr, partnum, &mut cblkptr.cblktab[i], paraptr)?;
        partnum += list.len() as Gnum;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_build::{graph_build, Grid2Gen};

    fn order_grid(dimx: Gnum, dimy: Gnum, text: &str) -> Order {
        let grafptr = Hgraph::from_graph(graph_build(0, &mut Grid2Gen::new(dimx, dimy)).unwrap());
        let mut order = Order::new(0, grafptr.vnohnbr).unwrap();
        let mut root = std::mem::take(&mut order.rootcblk);
        let strat = Strat::<HgraphOrder>::parse(text).unwrap();
        hgraph_order_st(&grafptr, &mut order, 0, &mut root, &strat).unwrap();
        order.rootcblk = root;
        order.check().unwrap();
        order
    }

    /// Ordinals of the leaves of `cblk`, numbered from `start`
    fn ordinal_range(cblk: &OrderCblk, start: Gnum) -> std::ops::Range<Gnum> {
        start..start + cblk.vnodnbr
    }

    fn check_nested(cblk: &OrderCblk, start: Gnum) {
        if cblk.typeval == CblkType::Nested {
            let r0 = ordinal_range(&cblk.cblktab[0], start);
            let r1 = ordinal_range(&cblk.cblktab[1], r0.end);
            assert!(r0.end <= r1.start);
            if let Some(sep) = cblk.cblktab.get(2) {
                let rs = ordinal_range(sep, r1.end);
                assert!(r1.end <= rs.start);
                assert_eq!(rs.end, start + cblk.vnodnbr);
            }
            check_nested(&cblk.cblktab[0], r0.start);
            check_nested(&cblk.cblktab[1], r1.start);
        }
    }

    #[test]
    fn dissects_a_grid() {
        let order = order_grid(
            12,
            12,
            "n{sep=/vert>16?g{pass=4}f;,ole=d{cmin=0,cmax=100000,frat=0.08},ose=s}",
        );
        assert_eq!(order.rootcblk.typeval, CblkType::Nested);
        assert_eq!(order.rang().last(), Some(&144));
        check_nested(&order.rootcblk, 0);
    }

    #[test]
    fn unsplit_graph_is_ordered_as_leaf() {
        // no separation at all: the leaf strategy orders the whole graph
        let order = order_grid(3, 3, "n{sep=z,ole=s,ose=s}");
        assert_eq!(order.cblknbr, 1);
        assert_eq!(order.peritab.as_slice(), &(0..9).collect::<Vec<_>>()[..]);
    }

    #[test]
    fn separator_vertices_are_ordered_last() {
        let grafptr = Hgraph::from_graph(graph_build(0, &mut Grid2Gen::new(7, 3)).unwrap());
        let mut order = Order::new(0, 21).unwrap();
        let mut root = std::mem::take(&mut order.rootcblk);
        let paraptr = HgraphOrderNdParam {
            sepstrat: Strat::parse("/vert>6?g{pass=3}f;").unwrap(),
            ordstratlea: HgraphOrder::simple(),
            ordstratsep: HgraphOrder::simple(),
        };
        hgraph_order_nd(&grafptr, &mut order, 0, &mut root, &paraptr).unwrap();
        order.rootcblk = root;
        order.check().unwrap();

        let sep = &order.rootcblk.cblktab[2];
        let sepfirst = order.vnodnbr - sep.vnodnbr;
        let permtax = order.peri();
        // the separator vertices split the parts: removing them leaves no edge across
        let sepverts: Vec<Gnum> = (sepfirst..21).map(|o| order.peritab[o]).collect();
        let n0 = order.rootcblk.cblktab[0].vnodnbr;
        for v in grafptr.vnoh_range() {
            if sepverts.contains(&v) {
                continue;
            }
            for &u in grafptr.s.neighbors(v) {
                if sepverts.contains(&u) {
                    continue;
                }
                assert_eq!(permtax[v] < n0, permtax[u] < n0, "edge {v}-{u} crosses the separator");
            }
        }
    }
}
