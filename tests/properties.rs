mod common;

use common::random_graph;
use fastrand::Rng;
use proptest::prelude::*;

use scotch::defs::Gnum;
use scotch::graph::VertList;
use scotch::hgraph_order_st::HgraphOrder;
use scotch::hgraph::Hgraph;
use scotch::library::{graph_order, graph_order_strat_default};
use scotch::strat::Strat;
use scotch::vgraph::Vgraph;
use scotch::vgraph_separate_st::{vgraph_separate_st, VgraphSeparate};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn orderings_are_permutations(
        seed in any::<u64>(),
        vertnbr in 1..300i64,
        degree in 0..8i64,
        baseval in 0..2i64,
    ) {
        let graf = random_graph(&mut Rng::with_seed(seed), baseval, vertnbr, degree);
        let order = graph_order(&graf, &graph_order_strat_default().unwrap()).unwrap();
        let permtax = order.peri();
        for (o, &v) in order.peritab.enumerate() {
            prop_assert_eq!(permtax[v], o);
        }
        let rangtab = order.rang();
        prop_assert_eq!(rangtab.len() as Gnum, order.cblknbr + 1);
        prop_assert_eq!(rangtab[order.cblknbr as usize], baseval + vertnbr);
    }

    #[test]
    fn separators_split_the_graph(
        seed in any::<u64>(),
        vertnbr in 2..200i64,
        degree in 1..6i64,
    ) {
        let graf = random_graph(&mut Rng::with_seed(seed), 0, vertnbr, degree);
        let mut grafdat = Vgraph::new(graf.clone()).unwrap();
        vgraph_separate_st(&mut grafdat, &VgraphSeparate::grow_refine()).unwrap();
        grafdat.check().unwrap();
        for v in graf.vert_range() {
            for &u in graf.neighbors(v) {
                let cut = grafdat.parttax[v] + grafdat.parttax[u] == 1;
                prop_assert!(!cut, "arc {} {} is cut", v, u);
            }
        }
    }

    #[test]
    fn induced_halo_graphs_are_consistent(
        seed in any::<u64>(),
        vertnbr in 1..150i64,
        degree in 0..6i64,
        keep in 0.0..1.0f64,
    ) {
        let mut rng = Rng::with_seed(seed);
        let graf = random_graph(&mut rng, 1, vertnbr, degree);
        let list = VertList::new(graf.vert_range().filter(|_| rng.f64() < keep).collect());
        let hgraf = Hgraph::from_graph(graf.clone());
        let indgraf = hgraf.induce_list(&list, vertnbr).unwrap();
        indgraf.check().unwrap();
        prop_assert_eq!(indgraf.vnohnbr, list.len() as Gnum);
        // induced vertex `1 + i` is `list[i]`, with its load and every original neighbor
        for (i, &v) in list.iter().enumerate() {
            let indv = 1 + i as Gnum;
            prop_assert_eq!(indgraf.s.vnum(indv), v);
            prop_assert_eq!(indgraf.s.velo(indv), graf.velo(v));
            prop_assert_eq!(indgraf.s.degree(indv), graf.degree(v));
            let mut adj: Vec<Gnum> =
                indgraf.s.neighbors(indv).iter().map(|&u| indgraf.s.vnum(u)).collect();
            adj.sort_unstable();
            prop_assert_eq!(&adj[..], graf.neighbors(v));
        }
        // halo vertices are the unlisted neighbors of listed vertices, each one once
        let mut halotab: Vec<Gnum> =
            (indgraf.vnohnnd..indgraf.s.vertnnd).map(|h| indgraf.s.vnum(h)).collect();
        halotab.sort_unstable();
        let mut expected: Vec<Gnum> = list
            .iter()
            .flat_map(|&v| graf.neighbors(v).iter().copied())
            .filter(|u| !list.iter().any(|v| v == u))
            .collect();
        expected.sort_unstable();
        expected.dedup();
        prop_assert_eq!(halotab, expected);
        let unhalo = indgraf.unhalo().unwrap();
        unhalo.check().unwrap();
    }

    #[test]
    fn saved_strategies_parse_back(cmin in 0..64i64, frat in 0.0..1.0f64, pass in 1..20i64) {
        let text = format!("n{{sep=g{{pass={pass}}}f,ole=f{{cmin={cmin},frat={frat}}},ose=s}}");
        let strat = Strat::<HgraphOrder>::parse(&text).unwrap();
        let saved = strat.save();
        prop_assert_eq!(Strat::<HgraphOrder>::parse(&saved).unwrap().save(), saved);
    }
}
