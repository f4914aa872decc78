mod common;

use common::*;

mod gmk {
    use super::*;

    #[test]
    fn grid2_header() {
        let out = Bin::Gmk.call_ok(&["grid2", "3", "2"], b"");
        let mut words = out.split_whitespace();
        // version, vertices, arcs
        assert_eq!(words.next(), Some("0"));
        assert_eq!(words.next(), Some("6"));
        assert_eq!(words.next(), Some("14"));
    }

    #[test]
    fn bad_dimension_fails() {
        let out = Bin::Gmk.call(&["grid2", "0", "2"], b"");
        assert!(!out.status.success());
        assert!(String::from_utf8_lossy(&out.stderr).contains("gmk: ERROR"));
    }
}

mod gord {
    use super::*;

    fn check_permutation(pairs: &[(i64, i64)], baseval: i64) {
        let n = pairs.len() as i64;
        let mut seen = vec![false; pairs.len()];
        for &(_, o) in pairs {
            assert!((baseval..baseval + n).contains(&o), "ordinal {o}");
            assert!(!std::mem::replace(&mut seen[(o - baseval) as usize], true));
        }
    }

    #[test]
    fn orders_a_generated_grid() {
        let graph = Bin::Gmk.call_ok(&["grid2", "10", "10"], b"");
        let out = Bin::Gord.call_ok(&[], graph.as_bytes());
        let pairs = parse_pairs(&out);
        assert_eq!(pairs.len(), 100);
        check_permutation(&pairs, 0);
    }

    #[test]
    fn orders_a_based_mesh() {
        let mesh = Bin::Gmk.call_ok(&["grid2", "6", "5", "--mesh", "-b", "1"], b"");
        let out = Bin::Gord.call_ok(&["--mesh"], mesh.as_bytes());
        let pairs = parse_pairs(&out);
        assert_eq!(pairs.len(), 7 * 6);
        check_permutation(&pairs, 1);
    }

    #[test]
    fn writes_block_map_and_tree() {
        let graph = Bin::Gmk.call_ok(&["grid3", "4", "4", "4"], b"");
        let map = scratch("gord.map");
        let tree = scratch("gord.tree");
        Bin::Gord.call_ok(
            &["-m", map.to_str().unwrap(), "-t", tree.to_str().unwrap()],
            graph.as_bytes(),
        );
        let maptab = parse_pairs(&std::fs::read_to_string(&map).unwrap());
        let treetab = parse_pairs(&std::fs::read_to_string(&tree).unwrap());
        assert_eq!(maptab.len(), 64);
        assert_eq!(treetab.len(), 64);
        for (&(v, c), &(w, f)) in maptab.iter().zip(&treetab) {
            assert_eq!(v, w);
            assert!(f == -1 || f > c, "block {c} has father {f}");
        }
        std::fs::remove_file(map).unwrap();
        std::fs::remove_file(tree).unwrap();
    }

    #[test]
    fn custom_strategy() {
        let graph = Bin::Gmk.call_ok(&["grid2", "5", "5"], b"");
        let out = Bin::Gord.call_ok(&["-o", "s"], graph.as_bytes());
        let pairs = parse_pairs(&out);
        assert!(pairs.iter().all(|&(v, o)| v == o));
    }

    #[test]
    fn bad_strategy_fails() {
        let graph = Bin::Gmk.call_ok(&["grid2", "5", "5"], b"");
        let out = Bin::Gord.call(&["-o", "n{sep=q}"], graph.as_bytes());
        assert!(!out.status.success());
        assert!(String::from_utf8_lossy(&out.stderr).contains("gord: ERROR"));
    }

    #[test]
    fn malformed_graph_fails() {
        let out = Bin::Gord.call(&[], b"0\n3 4 0\n000\n");
        assert!(!out.status.success());
    }
}

mod gmap {
    use super::*;

    #[test]
    fn maps_onto_complete_graph() {
        let graph = Bin::Gmk.call_ok(&["grid2", "8", "8"], b"");
        let out = Bin::Gmap.call_ok(&["-c", "4"], graph.as_bytes());
        let pairs = parse_pairs(&out);
        let mut loadtab = [0; 4];
        for (_, t) in pairs {
            loadtab[t as usize] += 1;
        }
        assert_eq!(loadtab.iter().sum::<i64>(), 64);
        assert!(loadtab.iter().all(|&l| l > 0));
    }

    #[test]
    fn reads_an_architecture_file() {
        let graph = Bin::Gmk.call_ok(&["grid2", "4", "4"], b"");
        let arch = scratch("cmplt.tgt");
        std::fs::write(&arch, "cmplt 2\n").unwrap();
        let out = Bin::Gmap.call_ok(&["-a", arch.to_str().unwrap(), "-s"], graph.as_bytes());
        assert!(parse_pairs(&out).iter().all(|&(_, t)| t == 0 || t == 1));
        std::fs::remove_file(arch).unwrap();
    }

    #[test]
    fn needs_an_architecture() {
        let graph = Bin::Gmk.call_ok(&["grid2", "4", "4"], b"");
        let out = Bin::Gmap.call(&[], graph.as_bytes());
        assert!(!out.status.success());
    }
}
