//! Source mesh files
//!
//! ```text
//! 1                                 version
//! <velmnbr> <vnodnbr> <edgenbr>     edgenbr counts arcs in both directions
//! <velmbas> <vnodbas> <flags>       one of the two bases is the base value
//! [label] [load] <degree> <neighbor>*       one line per vertex, in vertex order
//! ```

use std::collections::HashMap;
use std::io::{BufRead, Write};

use crate::defs::Gnum;
use crate::error::Result;
use crate::graph_io::{parse_flags, Tokens};
use crate::mesh::Mesh;
use crate::based::BasedVec;

/// Read a source mesh
pub fn mesh_load(reader: impl BufRead) -> Result<Mesh> {
    let mut toks = Tokens::read(reader)?;
    let version = toks.num("version")?;
    if version != 1 {
        return Err(toks.error(format!("unsupported mesh file version {version}")));
    }
    let velmnbr = toks.count("element count")?;
    let vnodnbr = toks.count("node count")?;
    let edgenbr = toks.count("arc count")?;
    let velmbas = toks.num("element base")?;
    let vnodbas = toks.num("node base")?;
    let baseval = velmbas.min(vnodbas);
    let elemfirst = velmbas == baseval && (velmbas != vnodbas || velmnbr == 0);
    if (baseval != 0 && baseval != 1)
        || (elemfirst && vnodbas != velmbas + velmnbr)
        || (!elemfirst && velmbas != vnodbas + vnodnbr)
    {
        return Err(toks.error(format!("invalid element and node bases {velmbas} {vnodbas}")));
    }
    let (haslbl, hasedlo, hasvelo) = parse_flags(&mut toks)?;
    if hasedlo {
        return Err(toks.error("meshes carry no edge loads"));
    }

    let vertnbr = (velmnbr + vnodnbr) as usize;
    let mut verttab = Vec::with_capacity(vertnbr);
    let mut vendtab = Vec::with_capacity(vertnbr);
    let mut edgetab = Vec::with_capacity(edgenbr as usize);
    let mut velotab = Vec::new();
    let mut vlbltab = Vec::new();
    for _ in 0..vertnbr {
        if haslbl {
            vlbltab.push(toks.num("vertex label")?);
        }
        if hasvelo {
            velotab.push(toks.count("vertex load")?);
        }
        let degr = toks.count("vertex degree")?;
        verttab.push(baseval + edgetab.len() as Gnum);
        for _ in 0..degr {
            edgetab.push(toks.num("neighbor")?);
        }
        vendtab.push(baseval + edgetab.len() as Gnum);
    }
    toks.finish()?;
    if edgetab.len() as Gnum != edgenbr {
        return Err(toks.error(format!("header announces {edgenbr} arcs, found {}", edgetab.len())));
    }

    if haslbl {
        let mut lblmap = HashMap::with_capacity(vertnbr);
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

    let (velotab, vnlotab) = if hasvelo {
        let split = if elemfirst { velmnbr } else { vnodnbr } as usize;
        let second = velotab.split_off(split);
        if elemfirst {
            (Some(velotab), Some(second))
        } else {
            (Some(second), Some(velotab))
        }
    } else {
        (None, None)
    };
    let mut mesh = Mesh::from_parts(
        baseval, velmnbr, vnodnbr, elemfirst, verttab, vendtab, edgetab, velotab, vnlotab,
    )?;
    if haslbl {
        mesh.vlbltax = Some(BasedVec::new(baseval, vlbltab));
    }
    mesh.check()?;
    Ok(mesh)
}

/// Write a source mesh
pub fn mesh_save(mesh: &Mesh, mut writer: impl Write) -> Result<()> {
    let hasvelo = mesh.velotax.is_some() || mesh.vnlotax.is_some();
    let haslbl = mesh.vlbltax.is_some();
    writeln!(
        writer,
        "1\n{}\t{}\t{}\n{}\t{}\t{}0{}",
        mesh.velmnbr,
        mesh.vnodnbr,
        mesh.edgenbr,
        mesh.velmbas,
        mesh.vnodbas,
        haslbl as u8,
        hasvelo as u8
    )?;
    for v in mesh.vert_range() {
        let mut line = String::new();
        if haslbl {
            line.push_str(&format!("{}\t", mesh.vlbl(v)));
        }
        if hasvelo {
            let load = if mesh.is_elem(v) { mesh.velo(v) } else { mesh.vnlo(v) };
            line.push_str(&format!("{load}\t"));
        }
        line.push_str(&mesh.degree(v).to_string());
        for &u in mesh.neighbors(v) {
            line.push_str(&format!("\t{}", mesh.vlbl(u)));
        }
        writeln!(writer, "{line}")?;
    }
    Ok(())
}
