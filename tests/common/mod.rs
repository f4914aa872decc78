#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use fastrand::Rng;
use scotch::defs::Gnum;
use scotch::graph::Graph;
use scotch::graph_build::{graph_build, AdjListGen};

const PRINT_CMDS: bool = true;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Bin {
    Gord,
    Gmap,
    Gmk,
}

impl Bin {
    fn exe(self) -> &'static str {
        match self {
            Bin::Gord => env!("CARGO_BIN_EXE_gord"),
            Bin::Gmap => env!("CARGO_BIN_EXE_gmap"),
            Bin::Gmk => env!("CARGO_BIN_EXE_gmk"),
        }
    }

    /// Run the binary with `args`, feeding `input` on standard input
    pub fn call(self, args: &[&str], input: &[u8]) -> Output {
        use std::io::Write;

        if PRINT_CMDS {
            eprintln!("running {} {}", self.exe(), args.join(" "));
        }
        let mut child = Command::new(self.exe())
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("could not spawn binary");
        child.stdin.take().unwrap().write_all(input).unwrap();
        child.wait_with_output().unwrap()
    }

    /// Run the binary and return its standard output, failing the test on error
    pub fn call_ok(self, args: &[&str], input: &[u8]) -> String {
        let out = self.call(args, input);
        assert!(
            out.status.success(),
            "{self:?} failed: {}",
            String::from_utf8_lossy(&out.stderr)
        );
        String::from_utf8(out.stdout).unwrap()
    }
}

/// Scratch file in the temporary directory, unique to the test process
pub fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("scotch-{}-{name}", std::process::id()))
}

/// Parse a `count` line followed by `label value` lines
pub fn parse_pairs(text: &str) -> Vec<(Gnum, Gnum)> {
    let mut lines = text.lines();
    let n: usize = lines.next().unwrap().trim().parse().unwrap();
    let pairs: Vec<(Gnum, Gnum)> = lines
        .map(|l| {
            let mut w = l.split_whitespace().map(|w| w.parse::<Gnum>().unwrap());
            (w.next().unwrap(), w.next().unwrap())
        })
        .collect();
    assert_eq!(pairs.len(), n);
    pairs
}

/// Random symmetric graph with unit loads
pub fn random_graph(rng: &mut Rng, baseval: Gnum, vertnbr: Gnum, degree: Gnum) -> Graph {
    graph_build(baseval, &mut AdjListGen::random(rng, vertnbr, degree)).unwrap()
}
