//! Separator thinning
//!
//! A separator vertex with no neighbor in one part can join that part without breaking the
//! separation.

use crate::vgraph::Vgraph;

pub fn vgraph_separate_th(grafptr: &mut Vgraph) {
    let frontab = std::mem::take(&mut grafptr.frontab);
    for &v in &frontab {
        let mut seen = [false; 3];
        for &u in grafptr.s.neighbors(v) {
            seen[grafptr.parttax[u] as usize] = true;
        }
        // the lighter part first
        let first = if grafptr.compload[0] <= grafptr.compload[1] { 0 } else { 1 };
        for part in [first, 1 - first] {
            if !seen[1 - part] {
                let velo = grafptr.s.velo(v);
                grafptr.parttax[v] = part as u8;
                grafptr.compload[part] += velo;
                grafptr.compload[2] -= velo;
                break;
            }
        }
    }
    grafptr.frontab = frontab;
    grafptr.update();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_build::{graph_build, Grid2Gen};

    #[test]
    fn thins_a_double_column() {
        let graf = graph_build(0, &mut Grid2Gen::new(6, 4)).unwrap();
        let mut vgraf = crate::vgraph::Vgraph::new(graf).unwrap();
        for v in 0..24 {
            vgraf.parttax[v] = match v % 6 {
                0..=1 => 0,
                2..=3 => 2,
                _ => 1,
            };
        }
        vgraf.update();
        vgraf.check().unwrap();
        vgraph_separate_th(&mut vgraf);
        vgraf.check().unwrap();
        assert_eq!(vgraf.compload[2], 4);
        assert_eq!(vgraf.compsize, [12, 8]);
    }
}
