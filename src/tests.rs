#![cfg(test)]

use crate::defs::Gnum;
use crate::graph::Graph;
use crate::graph_build::{graph_build, Grid2Gen};
use crate::hgraph_order_st::HgraphOrder;
use crate::hmesh_order_st::HmeshOrder;
use crate::library::{graph_order, graph_order_strat_default};
use crate::order::{CblkType, Order, OrderCblk};
use crate::strat::{Strat, StratDomain};
use crate::vgraph_separate_st::VgraphSeparate;
use crate::vmesh_separate_st::VmeshSeparate;

fn clique(n: Gnum) -> Graph {
    let mut verttab = vec![0];
    let mut edgetab = Vec::new();
    for v in 0..n {
        edgetab.extend((0..n).filter(|&u| u != v));
        verttab.push(edgetab.len() as Gnum);
    }
    Graph::from_csr(0, verttab, edgetab, None, None).unwrap()
}

/// Check that the parts of every nested node come before their separator; returns the leaf
/// count of `cblk`
fn check_nested(cblk: &OrderCblk) -> Gnum {
    match cblk.typeval {
        CblkType::Nested => {
            assert!(cblk.cblktab.len() == 2 || cblk.cblktab.len() == 3);
            // children are laid out in ordinal order: part 0, part 1, separator
            cblk.cblktab.iter().map(check_nested).sum()
        }
        _ if cblk.cblktab.is_empty() => 1,
        _ => cblk.cblktab.iter().map(check_nested).sum(),
    }
}

#[test]
fn grid_4x4_nested_dissection() {
    let graf = graph_build(0, &mut Grid2Gen::new(4, 4)).unwrap();
    let strat =
        Strat::<HgraphOrder>::parse("n{sep=/vert>2?g{pass=4}f;,ole=s,ose=s}").unwrap();
    let order = graph_order(&graf, &strat).unwrap();

    assert_eq!(order.rootcblk.typeval, CblkType::Nested);
    assert_eq!(order.rootcblk.cblktab.len(), 3);
    assert_eq!(check_nested(&order.rootcblk), order.cblknbr);
    let rangtab = order.rang();
    assert_eq!(rangtab.len() as Gnum, order.cblknbr + 1);
    assert_eq!(rangtab[order.cblknbr as usize] - rangtab[0], 16);
    let sizes: Gnum = rangtab.windows(2).map(|w| w[1] - w[0]).sum();
    assert_eq!(sizes, 16);
}

#[test]
fn isolated_vertex() {
    let graf = Graph::from_csr(0, vec![0, 0], vec![], None, None).unwrap();
    let order = graph_order(&graf, &graph_order_strat_default().unwrap()).unwrap();
    assert_eq!(order.cblknbr, 1);
    assert_eq!(order.peritab.as_slice(), &[0]);
}

#[test]
fn clique_is_a_single_block() {
    let graf = clique(5);
    for text in ["s", "d{cmin=0,cmax=100000,frat=0.08}", "f"] {
        let order = graph_order(&graf, &Strat::parse(text).unwrap()).unwrap();
        assert_eq!(order.cblknbr, 1, "{text}");
        assert_eq!(order.rang(), vec![0, 5]);
    }
}

#[test]
fn fathers_come_after_their_children() {
    let graf = graph_build(1, &mut Grid2Gen::new(9, 7)).unwrap();
    let strat = Strat::<HgraphOrder>::parse("n{sep=/vert>20?g{pass=4}f;,ole=f,ose=s}").unwrap();
    let order = graph_order(&graf, &strat).unwrap();
    assert!(order.cblknbr > 1);
    // block numbers follow ordinals, so a father always has a larger number
    for (i, &f) in order.tree().iter().enumerate() {
        let c = 1 + i as Gnum;
        assert!(f == -1 || f > c, "block {c} has father {f}");
    }
}

#[test]
fn separators_come_after_their_parts() {
    let graf = graph_build(0, &mut Grid2Gen::new(20, 20)).unwrap();
    let order = graph_order(&graf, &graph_order_strat_default().unwrap()).unwrap();
    fn walk(cblk: &OrderCblk, start: Gnum) {
        if cblk.typeval != CblkType::Nested {
            return;
        }
        let mut ordenum = start;
        for child in &cblk.cblktab {
            walk(child, ordenum);
            ordenum += child.vnodnbr;
        }
        if let [p0, p1, sep] = &cblk.cblktab[..] {
            let sepfirst = start + p0.vnodnbr + p1.vnodnbr;
            assert_eq!(sepfirst + sep.vnodnbr, start + cblk.vnodnbr);
        }
    }
    walk(&order.rootcblk, 0);
    let permtax = order.peri();
    assert_eq!(permtax.len(), 400);
}

/// Every method of a domain, with its default parameters, saves to a string that parses back
fn round_trip_all<D: StratDomain>() {
    for tab in D::methods() {
        let strat = Strat::<D>::method((tab.init)());
        let saved = strat.save();
        assert!(saved.starts_with(tab.name), "{saved}");
        let again = Strat::<D>::parse(&saved).unwrap_or_else(|e| panic!("{saved}: {e}"));
        assert_eq!(again.save(), saved);
    }
}

#[test]
fn every_default_method_round_trips() {
    round_trip_all::<HgraphOrder>();
    round_trip_all::<HmeshOrder>();
    round_trip_all::<VgraphSeparate>();
    round_trip_all::<VmeshSeparate>();
}

#[test]
fn orders_are_checked() {
    let mut order = Order::new(0, 3).unwrap();
    order.peritab.as_mut_slice().copy_from_slice(&[0, 2, 2]);
    assert!(order.check().is_err());
    order.peritab.as_mut_slice().copy_from_slice(&[0, 2, 1]);
    order.check().unwrap();
}
