//! Source graph files
//!
//! ```text
//! 0                      version
//! <vertnbr> <edgenbr>    edgenbr counts arcs, twice the number of edges
//! <baseval> <flags>      flags: 3 digits, labels / edge loads / vertex loads
//! [label] [load] <degree> ([edge load] <neighbor>)*     one line per vertex
//! ```
//!
//! When vertex labels are present, neighbors are given by label.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use crate::based::BasedVec;
use crate::defs::Gnum;
use crate::error::{Result, ScotchError};
use crate::graph::Graph;

/// Whitespace-separated numbers, with line tracking for error messages
pub(crate) struct Tokens {
    toks: Vec<(usize, String)>,
    pos: usize,
}

impl Tokens {
    pub fn read(mut reader: impl BufRead) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        let toks = text
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim_start().starts_with('#'))
            .flat_map(|(i, l)| l.split_whitespace().map(move |t| (i + 1, t.to_owned())))
            .collect();
        Ok(Self { toks, pos: 0 })
    }

    fn line(&self) -> usize {
        self.toks.get(self.pos).or(self.toks.last()).map_or(0, |t| t.0)
    }

    pub fn error(&self, msg: impl Into<String>) -> ScotchError {
        ScotchError::Parse { line: self.line(), msg: msg.into() }
    }

    pub fn word(&mut self, what: &str) -> Result<&str> {
        let Some((_, tok)) = self.toks.get(self.pos) else {
            return Err(self.error(format!("unexpected end of file, expected {what}")));
        };
        self.pos += 1;
        Ok(tok)
    }

    pub fn num(&mut self, what: &str) -> Result<Gnum> {
        let line = self.line();
        let word = self.word(what)?;
        word.parse().map_err(|_| ScotchError::Parse {
            line,
            msg: format!("invalid {what} \"{word}\""),
        })
    }

    /// Number that must not be negative
    pub fn count(&mut self, what: &str) -> Result<Gnum> {
        let n = self.num(what)?;
        if n < 0 {
            return Err(self.error(format!("negative {what}")));
        }
        Ok(n)
    }

    pub fn finish(&self) -> Result<()> {
        if self.pos < self.toks.len() {
            return Err(self.error("trailing data"));
        }
        Ok(())
    }
}

/// Parse a 3-digit flag field into (labels, edge loads, vertex loads)
pub(crate) fn parse_flags(toks: &mut Tokens) -> Result<(bool, bool, bool)> {
    let word = toks.word("property flags")?.to_owned();
    let digits: Vec<u32> = word.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != word.len() || digits.is_empty() || digits.len() > 3 {
        return Err(toks.error(format!("invalid property flags \"{word}\"")));
    }
    let flag = |i: usize| digits.len() > i && digits[digits.len() - 1 - i] != 0;
    Ok((flag(2), flag(1), flag(0)))
}

/// Read a source graph
pub fn graph_load(reader: impl BufRead) -> Result<Graph> {
    let mut toks = Tokens::read(reader)?;
    let version = toks.num("version")?;
    if version != 0 {
        return Err(toks.error(format!("unsupported graph file version {version}")));
    }
    let vertnbr = toks.count("vertex count")?;
    let edgenbr = toks.count("arc count")?;
    let baseval = toks.num("base value")?;
    if baseval != 0 && baseval != 1 {
        return Err(toks.error(format!("base value must be 0 or 1, got {baseval}")));
    }
    let (haslbl, hasedlo, hasvelo) = parse_flags(&mut toks)?;

    let mut verttab = Vec::with_capacity(vertnbr as usize);
    let mut vendtab = Vec::with_capacity(vertnbr as usize);
    let mut edgetab = Vec::with_capacity(edgenbr as usize);
    let mut velotab = hasvelo.then(|| Vec::with_capacity(vertnbr as usize));
    let mut vlbltab = haslbl.then(|| Vec::with_capacity(vertnbr as usize));
    let mut edlotab = hasedlo.then(|| Vec::with_capacity(edgenbr as usize));

    for _ in 0..vertnbr {
        if let Some(tab) = &mut vlbltab {
            tab.push(toks.num("vertex label")?);
        }
        if let Some(tab) = &mut velotab {
            tab.push(toks.count("vertex load")?);
        }
        let degr = toks.count("vertex degree")?;
        verttab.push(baseval + edgetab.len() as Gnum);
        for _ in 0..degr {
            if let Some(tab) = &mut edlotab {
                tab.push(toks.count("edge load")?);
            }
            edgetab.push(toks.num("neighbor")?);
        }
        vendtab.push(baseval + edgetab.len() as Gnum);
    }
    toks.finish()?;
    if edgetab.len() as Gnum != edgenbr {
        return Err(toks.error(format!("header announces {edgenbr} arcs, found {}", edgetab.len())));
    }

    if let Some(vlbltab) = &vlbltab {
        let mut lblmap = HashMap::with_capacity(vlbltab.len());
        for (i, &lbl) in vlbltab.iter().enumerate() {
            if lblmap.insert(lbl, baseval + i as Gnum).is_some() {
                return Err(toks.error(format!("duplicate vertex label {lbl}")));
            }
        }
        for end in edgetab.iter_mut() {
            *end = *lblmap
                .get(end)
                .ok_or_else(|| toks.error(format!("neighbor label {end} is not a vertex")))?;
        }
    }

    let mut graf = Graph::from_parts(
        baseval,
        BasedVec::new(baseval, verttab),
        BasedVec::new(baseval, vendtab),
        BasedVec::new(baseval, edgetab),
        velotab.map(|t| BasedVec::new(baseval, t)),
        edlotab.map(|t| BasedVec::new(baseval, t)),
    );
    graf.vlbltax = vlbltab.map(|t| BasedVec::new(baseval, t));
    graf.check()?;
    Ok(graf)
}

/// Write a source graph
pub fn graph_save(graf: &Graph, mut writer: impl Write) -> Result<()> {
    let flags = format!(
        "{}{}{}",
        graf.vlbltax.is_some() as u8,
        graf.edlotax.is_some() as u8,
        graf.velotax.is_some() as u8
    );
    writeln!(writer, "0\n{}\t{}\n{}\t{}", graf.vertnbr, graf.edgenbr, graf.baseval, flags)?;
    for v in graf.vert_range() {
        let mut line = String::new();
        if graf.vlbltax.is_some() {
            line.push_str(&format!("{}\t", graf.vlbl(v)));
        }
        if graf.velotax.is_some() {
            line.push_str(&format!("{}\t", graf.velo(v)));
        }
        line.push_str(&graf.degree(v).to_string());
        for e in graf.adj(v) {
            if graf.edlotax.is_some() {
                line.push_str(&format!("\t{}", graf.edlo(e)));
            }
            let u = graf.edgetax[e];
            line.push_str(&format!("\t{}", if graf.vlbltax.is_some() { graf.vlbl(u) } else { u }));
        }
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE_TAIL: &str = "0\n4 8\n1 011\n2 2 1 2 1 3\n3 3 1 1 1 3 2 4\n1 2 1 1 1 2\n1 1 2 2\n";

    #[test]
    fn loads_weighted_graph() {
        let graf = graph_load(TRIANGLE_TAIL.as_bytes()).unwrap();
        assert_eq!(graf.baseval, 1);
        assert_eq!(graf.vertnbr, 4);
        assert_eq!(graf.edgenbr, 8);
        assert_eq!(graf.velosum, 7);
        assert_eq!(graf.neighbors(2), &[1, 3, 4]);
        assert_eq!(graf.edlo(graf.verttax[2] + 2), 2);
    }

    #[test]
    fn saved_graph_reads_back() {
        let graf = graph_load(TRIANGLE_TAIL.as_bytes()).unwrap();
        let mut out = Vec::new();
        graph_save(&graf, &mut out).unwrap();
        let again = graph_load(&out[..]).unwrap();
        assert_eq!(again.edgetax, graf.edgetax);
        assert_eq!(again.edlotax, graf.edlotax);
        assert_eq!(again.velotax, graf.velotax);
    }

    #[test]
    fn labels_name_neighbors() {
        let text = "0\n3 4\n0 100\n10 1 30\n20 1 30\n30 2 10 20\n";
        let graf = graph_load(text.as_bytes()).unwrap();
        assert_eq!(graf.neighbors(2), &[0, 1]);
        assert_eq!(graf.vlbl(2), 30);
    }

    #[test]
    fn reports_bad_files() {
        assert!(matches!(
            graph_load("0\n2 2\n0 000\n1 1\n".as_bytes()),
            Err(ScotchError::Parse { line: 4, .. })
        ));
        assert!(graph_load("0\n2 3\n0 000\n1 1\n1 0\n".as_bytes()).is_err());
        assert!(graph_load("0\n2 2\n0 000\n1 1\n1 1\n".as_bytes()).is_err());
        assert!(graph_load("1\n".as_bytes()).is_err());
    }
}
