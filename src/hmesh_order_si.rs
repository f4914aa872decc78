//! Simple mesh ordering: non-halo nodes in increasing order

use crate::defs::Gnum;
use crate::error::Result;
use crate::hmesh::Hmesh;
use crate::order::Order;

pub fn hmesh_order_si(meshptr: &Hmesh, ordeptr: &mut Order, ordenum: Gnum) -> Result<()> {
    let vnodbas = meshptr.m.vnodbas;
    for n in meshptr.vnoh_range() {
        ordeptr.peritab[ordenum + n - vnodbas] = meshptr.m.vnum(n);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;

    #[test]
    fn orders_nodes_by_number() {
        let meshptr = Hmesh::from_mesh(Mesh::grid2(1, 2, 1).unwrap());
        let mut order = Order::new(1, 6).unwrap();
        hmesh_order_si(&meshptr, &mut order, 1).unwrap();
        order.check().unwrap();
        assert_eq!(order.peritab.as_slice(), &[1, 2, 3, 4, 5, 6]);
    }
}
