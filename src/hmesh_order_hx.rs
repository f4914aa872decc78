//! Halo minimum degree and minimum fill ordering of a halo mesh
//!
//! Mesh elements are the initial elements of the quotient graph, so that no nodal graph is built.

use crate::defs::Gnum;
use crate::error::Result;
use crate::hall_order_hd::{hall_order_hd, HallGraph, HallScore};
use crate::hall_order_hx::hall_order_hx_build;
use crate::hgraph_order_hx::HgraphOrderHxParam;
use crate::hmesh::Hmesh;
use crate::hmesh_order_si::hmesh_order_si;
use crate::order::{Order, OrderCblk};

/// Quotient graph of a halo mesh: nodes are variables, mesh elements are elements
pub(crate) fn hmesh_hall_graph(meshptr: &Hmesh) -> HallGraph {
    let mesh = &meshptr.m;
    let vnodbas = mesh.vnodbas;
    HallGraph {
        vnohnbr: meshptr.vnohnbr as usize,
        vartab: vec![Vec::new(); mesh.vnodnbr as usize],
        elmtab: mesh
            .elem_range()
            .map(|e| mesh.neighbors(e).iter().map(|&n| (n - vnodbas) as usize).collect())
            .collect(),
    }
}

pub fn hmesh_order_hx(
    meshptr: &Hmesh,
    ordeptr: &mut Order,
    ordenum: Gnum,
    cblkptr: &mut OrderCblk,
    paraptr: &HgraphOrderHxParam,
    kind: HallScore,
) -> Result<()> {
    if meshptr.vnohnbr < paraptr.colmin {
        return hmesh_order_si(meshptr, ordeptr, ordenum);
    }
    let ord = hall_order_hd(hmesh_hall_graph(meshptr), kind)?;
    let blocks = hall_order_hx_build(&ord, paraptr.colmin, paraptr.colmax, paraptr.fillrat)?;
    let vnodbas = meshptr.m.vnodbas;
    blocks.apply(ordeptr, cblkptr, ordenum, |n| meshptr.m.vnum(vnodbas + n as Gnum));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use crate::order::CblkType;

    fn order_with(meshptr: &Hmesh, paraptr: &HgraphOrderHxParam, kind: HallScore) -> Order {
        let mut order = Order::new(meshptr.m.baseval, meshptr.vnohnbr).unwrap();
        let mut root = std::mem::take(&mut order.rootcblk);
        hmesh_order_hx(meshptr, &mut order, meshptr.m.baseval, &mut root, paraptr, kind).unwrap();
        order.rootcblk = root;
        order.check().unwrap();
        order
    }

    #[test]
    fn single_element_is_one_block() {
        let meshptr = Hmesh::from_mesh(Mesh::grid3(0, 1, 1, 1).unwrap());
        for kind in [HallScore::Degree, HallScore::Fill] {
            let order = order_with(&meshptr, &HgraphOrderHxParam::default(), kind);
            assert_eq!(order.cblknbr, 1);
            assert_eq!(order.rang(), vec![0, 8]);
        }
    }

    #[test]
    fn grid_mesh_gives_an_elimination_tree() {
        let meshptr = Hmesh::from_mesh(Mesh::grid2(1, 6, 5).unwrap());
        let order = order_with(&meshptr, &HgraphOrderHxParam::default(), HallScore::Fill);
        assert!(order.cblknbr > 1);
        assert_eq!(order.rootcblk.typeval, CblkType::Tree);
    }

    #[test]
    fn halo_nodes_are_not_ordered() {
        let hmesh = Hmesh::from_mesh(Mesh::grid2(0, 4, 2).unwrap());
        let mesh = &hmesh.m;
        let mut parttax =
            crate::based::BasedVec::from_elem(0, 0, (mesh.velmnbr + mesh.vnodnbr) as usize);
        for n in mesh.node_range() {
            if (n - mesh.vnodbas) % 5 == 2 {
                parttax[n] = 2;
            }
        }
        for e in mesh.elem_range() {
            if (e - mesh.velmbas) % 4 >= 2 {
                parttax[e] = 1;
            }
        }
        for n in mesh.node_range() {
            if (n - mesh.vnodbas) % 5 > 2 {
                parttax[n] = 1;
            }
        }
        let part = hmesh.induce_part(&parttax, 0).unwrap();
        let mut order = Order::new(0, mesh.vnodnbr).unwrap();
        let mut root = OrderCblk::leaf(part.vnohnbr);
        let paraptr = HgraphOrderHxParam::default();
        hmesh_order_hx(&part, &mut order, 0, &mut root, &paraptr, HallScore::Degree).unwrap();
        let mut peri = order.peritab.as_slice()[..6].to_vec();
        peri.sort_unstable();
        assert_eq!(peri, vec![0, 1, 5, 6, 10, 11]);
    }
}
