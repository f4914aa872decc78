//! Halo submesh induction
//!
//! An induced submesh keeps a set of elements and a list of non-halo nodes. Every other node of a
//! kept element becomes a halo node of the submesh. Kept elements come first, then the non-halo
//! nodes in list order, then the halo nodes in order of discovery.

use crate::based::{try_vec, BasedVec};
use crate::defs::{Gnum, GraphPart, GNUM_NONE};
use crate::error::Result;
use crate::hmesh::Hmesh;
use crate::mesh::Mesh;

impl Hmesh {
    /// Submesh of the elements and non-halo nodes of part `partval`
    ///
    /// `parttax` covers the elements and the non-halo nodes, as a separation of
    /// [`Hmesh::mesh_view`] does. Separator nodes and previous halo nodes adjoining the kept
    /// elements form the halo of the submesh.
    pub fn induce_part(&self, parttax: &BasedVec<GraphPart>, partval: GraphPart) -> Result<Hmesh> {
        let elemlist: Vec<Gnum> =
            self.m.elem_range().filter(|&e| parttax[e] == partval).collect();
        let nodelist: Vec<Gnum> = self.vnoh_range().filter(|&n| parttax[n] == partval).collect();
        self.induce2(&elemlist, &nodelist)
    }

    /// Submesh of the separator nodes, with every element adjoining them
    pub fn induce_sepa(&self, parttax: &BasedVec<GraphPart>) -> Result<Hmesh> {
        let nodelist: Vec<Gnum> = self.vnoh_range().filter(|&n| parttax[n] == 2).collect();
        let mut elemflag = BasedVec::try_from_elem(self.m.velmbas, false, self.m.velmnbr as usize)?;
        for &n in &nodelist {
            for &e in self.m.neighbors(n) {
                elemflag[e] = true;
            }
        }
        let elemlist: Vec<Gnum> = self.m.elem_range().filter(|&e| elemflag[e]).collect();
        self.induce2(&elemlist, &nodelist)
    }

    fn induce2(&self, elemlist: &[Gnum], nodelist: &[Gnum]) -> Result<Hmesh> {
        let orgmesh = &self.m;
        let baseval = orgmesh.baseval;
        let indvelmnbr = elemlist.len() as Gnum;
        let indvnodbas = baseval + indvelmnbr;
        let indvnohnbr = nodelist.len() as Gnum;
        let indvnohnnd = indvnodbas + indvnohnbr;

        let mut orgindxtax = BasedVec::try_from_elem(
            baseval,
            GNUM_NONE,
            (orgmesh.velmnbr + orgmesh.vnodnbr) as usize,
        )?;
        for (i, &e) in elemlist.iter().enumerate() {
            orgindxtax[e] = baseval + i as Gnum;
        }
        for (i, &n) in nodelist.iter().enumerate() {
            orgindxtax[n] = indvnodbas + i as Gnum;
        }

        let edgeupper: usize = elemlist.iter().map(|&e| orgmesh.degree(e) as usize).sum();
        let mut indverttab = try_vec(elemlist.len() + nodelist.len())?;
        let mut indvendtab = try_vec(elemlist.len() + nodelist.len())?;
        let mut indvehdtab = try_vec(elemlist.len())?;
        let mut indedgetab: Vec<Gnum> = try_vec(2 * edgeupper)?;
        let mut halotab: Vec<Gnum> = Vec::new();
        let mut veihnbr = 0;
        let mut enohnbr = 0;

        /* Elements, non-halo nodes first */
        for &e in elemlist {
            let vert = baseval + indedgetab.len() as Gnum;
            indverttab.push(vert);
            let degr = orgmesh.degree(e) as usize;
            let mut front = indedgetab.len();
            let mut back = front + degr;
            indedgetab.resize(back, GNUM_NONE);
            for &n in orgmesh.neighbors(e) {
                let mut indn = orgindxtax[n];
                if indn == GNUM_NONE {
                    indn = indvnohnnd + halotab.len() as Gnum;
                    orgindxtax[n] = indn;
                    halotab.push(n);
                }
                if indn < indvnohnnd {
                    indedgetab[front] = indn;
                    front += 1;
                } else {
                    back -= 1;
                    indedgetab[back] = indn;
                }
            }
            let vehd = baseval + front as Gnum;
            indvehdtab.push(vehd);
            if vehd == vert {
                veihnbr += 1;
            }
            enohnbr += 2 * (vehd - vert);
            indvendtab.push(baseval + indedgetab.len() as Gnum);
        }

        /* Nodes, keeping the elements of the submesh only */
        for &n in nodelist.iter().chain(halotab.iter()) {
            indverttab.push(baseval + indedgetab.len() as Gnum);
            for &e in orgmesh.neighbors(n) {
                let inde = orgindxtax[e];
                if inde != GNUM_NONE {
                    indedgetab.push(inde);
                }
            }
            indvendtab.push(baseval + indedgetab.len() as Gnum);
        }
        indedgetab.shrink_to_fit();

        let indvelotab =
            orgmesh.velotax.as_ref().map(|_| elemlist.iter().map(|&e| orgmesh.velo(e)).collect());
        let indvnlotab = orgmesh
            .vnlotax
            .as_ref()
            .map(|_| nodelist.iter().chain(halotab.iter()).map(|&n| orgmesh.vnlo(n)).collect());
        let indvnumtab: Vec<Gnum> =
            nodelist.iter().chain(halotab.iter()).map(|&n| orgmesh.vnum(n)).collect();

        let mut m = Mesh::from_parts(
            baseval,
            indvelmnbr,
            indvnohnbr + halotab.len() as Gnum,
            true,
            indverttab,
            indvendtab,
            indedgetab,
            indvelotab,
            indvnlotab,
        )?;
        m.vnumtax = Some(BasedVec::new(indvnodbas, indvnumtab));
        let vnhlsum = nodelist.iter().map(|&n| orgmesh.vnlo(n)).sum();
        let indmesh = Hmesh {
            m,
            vehdtax: BasedVec::new(baseval, indvehdtab),
            veihnbr,
            vnohnbr: indvnohnbr,
            vnohnnd: indvnohnnd,
            vnhlsum,
            enohnbr,
            levlnum: self.levlnum + 1,
        };

        #[cfg(debug_assertions)]
        indmesh.check()?;
        Ok(indmesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x2 element grid cut by the third node column
    fn cut_grid() -> (Hmesh, BasedVec<GraphPart>) {
        let hmesh = Hmesh::from_mesh(Mesh::grid2(0, 4, 2).unwrap());
        let mesh = &hmesh.m;
        let mut parttax = BasedVec::from_elem(0, 0, (mesh.velmnbr + mesh.vnodnbr) as usize);
        for e in mesh.elem_range() {
            if (e - mesh.velmbas) % 4 >= 2 {
                parttax[e] = 1;
            }
        }
        for n in mesh.node_range() {
            let x = (n - mesh.vnodbas) % 5;
            parttax[n] = match x {
                0 | 1 => 0,
                2 => 2,
                _ => 1,
            };
        }
        (hmesh, parttax)
    }

    #[test]
    fn parts_keep_separator_as_halo() {
        let (hmesh, parttax) = cut_grid();
        for partval in 0..2 {
            let indmesh = hmesh.induce_part(&parttax, partval).unwrap();
            indmesh.check().unwrap();
            assert_eq!(indmesh.m.velmnbr, 4);
            assert_eq!(indmesh.vnohnbr, 6);
            assert_eq!(indmesh.m.vnodnbr, 9);
            assert_eq!(indmesh.levlnum, 1);
            for h in indmesh.vnohnnd..indmesh.m.vnodnnd {
                assert_eq!(indmesh.m.vnum(h) % 5, 2);
            }
        }
    }

    #[test]
    fn separator_submesh_takes_bordering_elements() {
        let (hmesh, parttax) = cut_grid();
        let indmesh = hmesh.induce_sepa(&parttax).unwrap();
        indmesh.check().unwrap();
        assert_eq!(indmesh.vnohnbr, 3);
        assert_eq!(indmesh.m.velmnbr, 4);
        // node columns 1 and 3 become halo
        assert_eq!(indmesh.m.vnodnbr, 9);
        assert_eq!(indmesh.veihnbr, 0);
        let vnums: Vec<Gnum> = indmesh.vnoh_range().map(|n| indmesh.m.vnum(n)).collect();
        assert_eq!(vnums, vec![2, 7, 12]);
    }

    #[test]
    fn induced_halo_is_propagated() {
        let (hmesh, parttax) = cut_grid();
        let part = hmesh.induce_part(&parttax, 1).unwrap();
        // keep the rightmost column of part 1: one more halo column appears
        let view = part.mesh_view().unwrap();
        let mut subtax = BasedVec::from_elem(0, 0, (view.velmnbr + view.vnodnbr) as usize);
        for e in view.elem_range() {
            let x = view.neighbors(e).iter().map(|&n| part.m.vnum(n) % 5).max().unwrap();
            subtax[e] = if x == 4 { 1 } else { 0 };
        }
        for n in view.node_range() {
            subtax[n] = match part.m.vnum(n) % 5 {
                3 => 2,
                4 => 1,
                _ => 0,
            };
        }
        let sub = part.induce_part(&subtax, 1).unwrap();
        sub.check().unwrap();
        assert_eq!(sub.m.velmnbr, 2);
        assert_eq!(sub.vnohnbr, 3);
        assert_eq!(sub.m.vnodnbr, 6);
        assert_eq!(sub.levlnum, 2);
        let mut halo: Vec<Gnum> = (sub.vnohnnd..sub.m.vnodnnd).map(|h| sub.m.vnum(h)).collect();
        halo.sort_unstable();
        assert_eq!(halo, vec![3, 8, 13]);
    }
}
