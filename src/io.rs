use crate::graph::{BaseGraph, HashMapGraph, MutableGraph};
use std::convert::TryFrom;
use std::io;
use std::io::{BufRead, Write};

#[cfg(feature = "log")]
use log::warn;

fn invalid_input(message: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}

fn parse_pair(line: &str) -> Option<(usize, usize)> {
    let nums: Vec<Result<usize, std::num::ParseIntError>> =
        line.split_whitespace().map(|s| s.parse()).collect();
    match nums.as_slice() {
        [Ok(u), Ok(v)] => Some((*u, *v)),
        _ => None,
    }
}

pub fn dimacs_p(line: &str) -> Result<(usize, usize), io::Error> {
    parse_pair(
        line.trim_start_matches('p')
            .trim()
            .trim_start_matches("edge")
            .trim_start_matches("col"),
    )
    .ok_or_else(|| invalid_input("Invalid problem line"))
}

pub fn dimacs_e(line: &str) -> Result<(usize, usize), io::Error> {
    parse_pair(line.trim_start_matches('e')).ok_or_else(|| invalid_input("Invalid edge line"))
}

/// `VERTICES = N` style header value.
fn header_value(line: &str, key: &str) -> Option<Result<usize, io::Error>> {
    let mut parts = line.splitn(2, '=');
    let name = parts.next()?.trim();
    if !name.eq_ignore_ascii_case(key) {
        return None;
    }
    Some(
        parts
            .next()
            .and_then(|value| value.trim().parse().ok())
            .ok_or_else(|| invalid_input("Invalid header line")),
    )
}

/// A graph read from text, with the 1-based numbers of the lines that were skipped
/// because they could not be parsed.
#[derive(Debug, Clone)]
pub struct ParsedGraph {
    pub graph: HashMapGraph,
    pub malformed_lines: Vec<usize>,
}

struct GraphBuilder {
    graph: Option<HashMapGraph>,
    n: usize,
    malformed_lines: Vec<usize>,
}

impl GraphBuilder {
    fn new() -> Self {
        Self {
            graph: None,
            n: 0,
            malformed_lines: Vec::new(),
        }
    }

    fn with_vertices(&mut self, n: usize) {
        let mut graph = HashMapGraph::with_capacity(n);
        for v in 1..=n {
            graph.add_vertex(v);
        }
        self.graph = Some(graph);
        self.n = n;
    }

    fn skip(&mut self, line_number: usize, line: &str) {
        #[cfg(feature = "log")]
        warn!("skipping malformed line {}: {:?}", line_number, line);
        #[cfg(not(feature = "log"))]
        let _ = line;
        self.malformed_lines.push(line_number);
    }

    fn add_edge(&mut self, line_number: usize, line: &str, edge: Option<(usize, usize)>) {
        let n = self.n;
        if let (Some(graph), Some((u, v))) = (self.graph.as_mut(), edge) {
            if u != v && (1..=n).contains(&u) && (1..=n).contains(&v) {
                graph.add_edge(u, v);
                return;
            }
        }
        self.skip(line_number, line);
    }

    fn finish(self) -> Result<ParsedGraph, io::Error> {
        match self.graph {
            Some(graph) => Ok(ParsedGraph {
                graph,
                malformed_lines: self.malformed_lines,
            }),
            None => Err(invalid_input("Missing vertex count")),
        }
    }
}

/// Line based edge list:
///
/// ```text
/// // comment
/// VERTICES = 3
/// EDGES = 2
/// 1 2
/// 2 3
/// ```
///
/// Vertices are numbered from 1. Lines that do not parse are skipped and reported.
pub struct EdgeListRead<T: BufRead>(pub T);

impl<T: BufRead> EdgeListRead<T> {
    pub fn parse(self) -> Result<ParsedGraph, io::Error> {
        let mut builder = GraphBuilder::new();
        for (i, line) in self.0.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("//") {
                continue;
            }
            if let Some(n) = header_value(trimmed, "VERTICES") {
                if builder.graph.is_some() {
                    builder.skip(i + 1, trimmed);
                } else {
                    builder.with_vertices(n?);
                }
                continue;
            }
            if header_value(trimmed, "EDGES").is_some() {
                continue;
            }
            builder.add_edge(i + 1, trimmed, parse_pair(trimmed));
        }
        builder.finish()
    }
}

impl<T: BufRead> TryFrom<EdgeListRead<T>> for HashMapGraph {
    type Error = io::Error;

    fn try_from(reader: EdgeListRead<T>) -> Result<Self, Self::Error> {
        Ok(reader.parse()?.graph)
    }
}

/// DIMACS `.col` files: `c` comments, a `p edge N M` problem line and `e u v` edges.
pub struct DimacsRead<T: BufRead>(pub T);

impl<T: BufRead> DimacsRead<T> {
    pub fn parse(self) -> Result<ParsedGraph, io::Error> {
        let mut builder = GraphBuilder::new();
        for (i, line) in self.0.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            match trimmed.chars().next() {
                None | Some('c') => {}
                Some('p') => {
                    let (n, _) = dimacs_p(trimmed)?;
                    builder.with_vertices(n);
                }
                Some('e') => builder.add_edge(i + 1, trimmed, dimacs_e(trimmed).ok()),
                _ => builder.skip(i + 1, trimmed),
            };
        }
        builder.finish()
    }
}

impl<T: BufRead> TryFrom<DimacsRead<T>> for HashMapGraph {
    type Error = io::Error;

    fn try_from(reader: DimacsRead<T>) -> Result<Self, Self::Error> {
        Ok(reader.parse()?.graph)
    }
}

/// Writes a graph with its color register as GEXF for graph viewers.
pub struct GexfWriter<'a, W: Write> {
    graph: &'a HashMapGraph,
    writer: W,
}

impl<'a, W: Write> GexfWriter<'a, W> {
    pub fn new(graph: &'a HashMapGraph, writer: W) -> Self {
        Self { graph, writer }
    }

    pub fn output(mut self) -> Result<(), io::Error> {
        let mut vertices: Vec<usize> = self.graph.vertices().collect();
        vertices.sort_unstable();

        writeln!(self.writer, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            self.writer,
            r#"<gexf xmlns="http://www.gexf.net/1.2draft" version="1.2">"#
        )?;
        writeln!(
            self.writer,
            r#"  <graph mode="static" defaultedgetype="undirected">"#
        )?;
        writeln!(self.writer, r#"    <attributes class="node">"#)?;
        writeln!(
            self.writer,
            r#"      <attribute id="0" title="color" type="integer"/>"#
        )?;
        writeln!(self.writer, "    </attributes>")?;

        writeln!(self.writer, "    <nodes>")?;
        for v in vertices.iter() {
            match self.graph.color(*v) {
                Some(color) => {
                    writeln!(self.writer, r#"      <node id="{0}" label="{0}">"#, v)?;
                    writeln!(
                        self.writer,
                        r#"        <attvalues><attvalue for="0" value="{}"/></attvalues>"#,
                        color
                    )?;
                    writeln!(self.writer, "      </node>")?;
                }
                None => writeln!(self.writer, r#"      <node id="{0}" label="{0}"/>"#, v)?,
            }
        }
        writeln!(self.writer, "    </nodes>")?;

        writeln!(self.writer, "    <edges>")?;
        let mut id = 0;
        for u in vertices.iter() {
            let mut neighbors: Vec<usize> =
                self.graph.neighborhood(*u).filter(|v| u < v).collect();
            neighbors.sort_unstable();
            for v in neighbors {
                writeln!(
                    self.writer,
                    r#"      <edge id="{}" source="{}" target="{}"/>"#,
                    id, u, v
                )?;
                id += 1;
            }
        }
        writeln!(self.writer, "    </edges>")?;
        writeln!(self.writer, "  </graph>")?;
        writeln!(self.writer, "</gexf>")?;
        self.writer.flush()
    }
}
