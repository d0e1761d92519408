//! ICCAD 2022/2023 contest benchmark reader.
//!
//! The contest format is a whitespace-token stream of keyword-prefixed
//! records. The two contest years differ only in two places: the 2023
//! `LibCell` record carries a leading `Y`/`N` macro flag, and the 2023
//! terminal section ends with a `TerminalCost` record. [`detect_format`]
//! tells the years apart by the presence of `TerminalCost`.
//!
//! Reading produces a [`Design`] (root block with instances, nets, and the
//! top die's row grid, plus one technology per die ready for the topology
//! builder) together with the [`BenchInfo`] sidecar of contest parameters
//! that have no database counterpart.

use crate::error::BenchError;
use std::collections::BTreeMap;
use std::path::Path;
use strata_common::{Point, Rect};
use strata_db::{
    Design, InstKind, Instance, Master, MasterKind, MasterPin, PinDirection, Row, RowOrient, Site,
    Technology,
};

/// Which contest year's grammar to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchFormat {
    /// ICCAD 2022: no macro flags, no terminal cost.
    Iccad2022,
    /// ICCAD 2023: `LibCell` macro flag and `TerminalCost` record.
    Iccad2023,
}

/// One die's row grid parameters, verbatim from the benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpec {
    /// Leftmost X of each row.
    pub start_x: i64,
    /// Y of the first row.
    pub start_y: i64,
    /// Row length in database units.
    pub row_width: i64,
    /// Row (site) height in database units.
    pub row_height: i64,
    /// Number of rows.
    pub repeat_count: i64,
}

/// Inter-die terminal parameters. Carried for reporting; terminals are not
/// physical cells in this database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSpec {
    /// Terminal width.
    pub width: i64,
    /// Terminal height.
    pub height: i64,
    /// Minimum spacing between terminals.
    pub spacing: i64,
    /// Per-terminal cost (2023 only; zero for 2022).
    pub cost: i64,
}

/// One die's contest parameters.
#[derive(Debug, Clone)]
pub struct DieSpec {
    /// Maximum utilization in percent.
    pub max_util: i64,
    /// Row grid parameters.
    pub rows: RowSpec,
    /// Name of the technology this die is manufactured in.
    pub tech: String,
}

/// Contest parameters that sit alongside the constructed design.
#[derive(Debug, Clone)]
pub struct BenchInfo {
    /// The grammar the file was read with.
    pub format: BenchFormat,
    /// The die outline, shared by both dies.
    pub die_area: Rect,
    /// Per-die parameters in stacking order (top first).
    pub dies: Vec<DieSpec>,
    /// Inter-die terminal parameters.
    pub terminal: TerminalSpec,
}

/// Decides the grammar for a benchmark text.
pub fn detect_format(text: &str) -> BenchFormat {
    if text.contains("TerminalCost") {
        BenchFormat::Iccad2023
    } else {
        BenchFormat::Iccad2022
    }
}

/// Reads a benchmark file and constructs the design database.
pub fn read_bench(path: &Path) -> Result<(Design, BenchInfo), BenchError> {
    let text = std::fs::read_to_string(path)?;
    parse_bench(&text)
}

/// Parses benchmark text and constructs the design database.
pub fn parse_bench(text: &str) -> Result<(Design, BenchInfo), BenchError> {
    let format = detect_format(text);
    let mut tokens = Tokens::new(text);
    let parsed = parse(&mut tokens, format)?;
    construct(parsed, format)
}

/// A parsed library cell, before technology construction.
struct LibCell {
    is_macro: bool,
    name: String,
    width: i64,
    height: i64,
    pins: Vec<(String, Point)>,
}

/// A parsed `Tech` section.
struct TechSection {
    name: String,
    cells: Vec<LibCell>,
}

struct Parsed {
    techs: Vec<TechSection>,
    die_area: Rect,
    dies: Vec<DieSpec>,
    terminal: TerminalSpec,
    insts: Vec<(String, String)>,
    nets: Vec<(String, Vec<(String, String, u32)>)>,
}

fn parse(tokens: &mut Tokens<'_>, format: BenchFormat) -> Result<Parsed, BenchError> {
    tokens.keyword("NumTechnologies")?;
    let num_techs = tokens.int("technology count")?;

    let mut techs = Vec::new();
    for _ in 0..num_techs {
        tokens.keyword("Tech")?;
        let tech_name = tokens.ident("technology name")?.to_string();
        let cell_count = tokens.int("lib cell count")?;
        let mut cells = Vec::new();
        for _ in 0..cell_count {
            tokens.keyword("LibCell")?;
            let is_macro = match format {
                BenchFormat::Iccad2022 => false,
                BenchFormat::Iccad2023 => {
                    let (flag, line) = tokens.next("macro flag Y or N")?;
                    match flag {
                        "N" => false,
                        "Y" => true,
                        other => {
                            return Err(BenchError::UnexpectedToken {
                                expected: "macro flag Y or N",
                                found: other.to_string(),
                                line,
                            })
                        }
                    }
                }
            };
            let name = tokens.ident("lib cell name")?.to_string();
            let width = tokens.int("lib cell width")?;
            let height = tokens.int("lib cell height")?;
            let pin_count = tokens.int("pin count")?;
            let mut pins = Vec::new();
            for _ in 0..pin_count {
                tokens.keyword("Pin")?;
                let pin_name = tokens.ident("pin name")?.to_string();
                let x = tokens.int("pin X")?;
                let y = tokens.int("pin Y")?;
                pins.push((pin_name, Point::new(x, y)));
            }
            cells.push(LibCell {
                is_macro,
                name,
                width,
                height,
                pins,
            });
        }
        techs.push(TechSection {
            name: tech_name,
            cells,
        });
    }

    tokens.keyword("DieSize")?;
    let llx = tokens.int("die lower-left X")?;
    let lly = tokens.int("die lower-left Y")?;
    let urx = tokens.int("die upper-right X")?;
    let ury = tokens.int("die upper-right Y")?;
    let die_area = Rect::new(llx, lly, urx, ury);

    tokens.keyword("TopDieMaxUtil")?;
    let top_util = tokens.int("top die max util")?;
    tokens.keyword("BottomDieMaxUtil")?;
    let bottom_util = tokens.int("bottom die max util")?;

    tokens.keyword("TopDieRows")?;
    let top_rows = parse_row_spec(tokens)?;
    tokens.keyword("BottomDieRows")?;
    let bottom_rows = parse_row_spec(tokens)?;

    tokens.keyword("TopDieTech")?;
    let top_tech = tokens.ident("top die tech name")?.to_string();
    tokens.keyword("BottomDieTech")?;
    let bottom_tech = tokens.ident("bottom die tech name")?.to_string();

    tokens.keyword("TerminalSize")?;
    let term_w = tokens.int("terminal width")?;
    let term_h = tokens.int("terminal height")?;
    tokens.keyword("TerminalSpacing")?;
    let term_spacing = tokens.int("terminal spacing")?;
    let term_cost = match format {
        BenchFormat::Iccad2022 => 0,
        BenchFormat::Iccad2023 => {
            tokens.keyword("TerminalCost")?;
            tokens.int("terminal cost")?
        }
    };

    tokens.keyword("NumInstances")?;
    let inst_count = tokens.int("instance count")?;
    let mut insts = Vec::new();
    for _ in 0..inst_count {
        tokens.keyword("Inst")?;
        let inst_name = tokens.ident("instance name")?.to_string();
        let cell_name = tokens.ident("lib cell name")?.to_string();
        insts.push((inst_name, cell_name));
    }

    tokens.keyword("NumNets")?;
    let net_count = tokens.int("net count")?;
    let mut nets = Vec::new();
    for _ in 0..net_count {
        tokens.keyword("Net")?;
        let net_name = tokens.ident("net name")?.to_string();
        let pin_count = tokens.int("net pin count")?;
        let mut pins = Vec::new();
        for _ in 0..pin_count {
            tokens.keyword("Pin")?;
            let (pin_ref, line) = tokens.next("pin reference")?;
            let Some((inst, pin)) = pin_ref.split_once('/') else {
                return Err(BenchError::BadPinRef {
                    pin: pin_ref.to_string(),
                    line,
                });
            };
            pins.push((inst.to_string(), pin.to_string(), line));
        }
        nets.push((net_name, pins));
    }

    Ok(Parsed {
        techs,
        die_area,
        dies: vec![
            DieSpec {
                max_util: top_util,
                rows: top_rows,
                tech: top_tech,
            },
            DieSpec {
                max_util: bottom_util,
                rows: bottom_rows,
                tech: bottom_tech,
            },
        ],
        terminal: TerminalSpec {
            width: term_w,
            height: term_h,
            spacing: term_spacing,
            cost: term_cost,
        },
        insts,
        nets,
    })
}

fn parse_row_spec(tokens: &mut Tokens<'_>) -> Result<RowSpec, BenchError> {
    Ok(RowSpec {
        start_x: tokens.int("row start X")?,
        start_y: tokens.int("row start Y")?,
        row_width: tokens.int("row width")?,
        row_height: tokens.int("row height")?,
        repeat_count: tokens.int("row repeat count")?,
    })
}

/// Builds a [`Technology`] from a parsed `Tech` section. The contest gives
/// no pin directions; by convention the last pin of each cell is the output.
fn build_tech(name: &str, cells: &[LibCell]) -> Technology {
    let mut tech = Technology::new(name);
    for cell in cells {
        let pin_count = cell.pins.len();
        let pins = cell
            .pins
            .iter()
            .enumerate()
            .map(|(i, (pin_name, offset))| MasterPin {
                name: pin_name.clone(),
                direction: if i + 1 == pin_count {
                    PinDirection::Output
                } else {
                    PinDirection::Input
                },
                offset: *offset,
            })
            .collect();
        tech.add_master(Master {
            name: cell.name.clone(),
            width: cell.width,
            height: cell.height,
            kind: if cell.is_macro {
                MasterKind::Block
            } else {
                MasterKind::Core
            },
            site: None,
            pins,
        });
    }
    tech
}

fn construct(parsed: Parsed, format: BenchFormat) -> Result<(Design, BenchInfo), BenchError> {
    let section_index: BTreeMap<&str, usize> = parsed
        .techs
        .iter()
        .enumerate()
        .map(|(i, t)| (t.name.as_str(), i))
        .collect();
    for die in &parsed.dies {
        if !section_index.contains_key(die.tech.as_str()) {
            return Err(BenchError::UnknownTech(die.tech.clone()));
        }
    }

    // The flattened parent uses the top die's library, per the contest
    // convention that both dies expose the same cell list.
    let top_section = &parsed.techs[section_index[parsed.dies[0].tech.as_str()]];
    let mut design = Design::new("top", build_tech("top_hier", &top_section.cells));
    let root = design.root;
    design.block_mut(root).die_area = parsed.die_area;

    // One technology per die, in stacking order, ready for the topology
    // builder (root tech + N die techs).
    for die in &parsed.dies {
        let section = &parsed.techs[section_index[die.tech.as_str()]];
        design.add_tech(build_tech(&section.name, &section.cells));
    }

    for (inst_name, cell_name) in &parsed.insts {
        let root_tech = design.tech(design.block(root).tech);
        let Some(master) = root_tech.find_master(cell_name) else {
            return Err(BenchError::UnknownMaster {
                inst: inst_name.clone(),
                master: cell_name.clone(),
            });
        };
        design
            .block_mut(root)
            .create_instance(Instance::new(inst_name.clone(), InstKind::Cell { master }));
    }

    for (net_name, pins) in &parsed.nets {
        let net = design.block_mut(root).create_net(net_name.clone());
        for (inst_name, pin_name, _line) in pins {
            let Some(inst) = design.block(root).find_instance(inst_name) else {
                return Err(BenchError::UnknownInstance {
                    net: net_name.clone(),
                    inst: inst_name.clone(),
                });
            };
            design.block_mut(root).connect(inst, pin_name, net);
        }
    }

    build_rows(&mut design, &parsed.dies[0].rows);

    let info = BenchInfo {
        format,
        die_area: parsed.die_area,
        dies: parsed.dies,
        terminal: parsed.terminal,
    };
    Ok((design, info))
}

/// Builds the root block's row grid from the top die's row parameters.
///
/// The site width is the narrowest master actually instantiated; the site
/// height is the row height. Rows that would overrun the die top are
/// dropped.
fn build_rows(design: &mut Design, spec: &RowSpec) {
    let root = design.root;
    let site_width = {
        let block = design.block(root);
        let tech = design.tech(block.tech);
        block
            .instances()
            .filter_map(|(_, inst)| inst.master())
            .map(|m| tech.master(m).width)
            .min()
            .unwrap_or(spec.row_height)
    };
    if site_width <= 0 || spec.row_height <= 0 {
        return;
    }
    let site = Site {
        name: "core".to_string(),
        width: site_width,
        height: spec.row_height,
    };
    design.tech_mut(design.block(root).tech).add_site(site.clone());

    let site_count = spec.row_width / site_width;
    let die_top = design.block(root).die_area.hi.y;
    let mut row_count = spec.repeat_count;
    while row_count > 0 && row_count * spec.row_height > die_top {
        row_count -= 1;
    }
    for i in 0..row_count {
        design.block_mut(root).add_row(Row {
            name: format!("row{i}"),
            origin: Point::new(0, i * spec.row_height),
            site: site.clone(),
            site_count,
            orient: RowOrient::FlippedX,
        });
    }
}

/// Whitespace token stream with 1-based line tracking.
struct Tokens<'a> {
    toks: Vec<(&'a str, u32)>,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        let mut toks = Vec::new();
        for (i, line) in text.lines().enumerate() {
            for tok in line.split_whitespace() {
                toks.push((tok, i as u32 + 1));
            }
        }
        Self { toks, pos: 0 }
    }

    fn next(&mut self, expected: &'static str) -> Result<(&'a str, u32), BenchError> {
        let Some(&(tok, line)) = self.toks.get(self.pos) else {
            return Err(BenchError::UnexpectedEof { expected });
        };
        self.pos += 1;
        Ok((tok, line))
    }

    fn keyword(&mut self, kw: &'static str) -> Result<(), BenchError> {
        let (tok, line) = self.next(kw)?;
        if tok == kw {
            Ok(())
        } else {
            Err(BenchError::UnexpectedToken {
                expected: kw,
                found: tok.to_string(),
                line,
            })
        }
    }

    fn ident(&mut self, expected: &'static str) -> Result<&'a str, BenchError> {
        Ok(self.next(expected)?.0)
    }

    fn int(&mut self, expected: &'static str) -> Result<i64, BenchError> {
        let (tok, line) = self.next(expected)?;
        tok.parse().map_err(|_| BenchError::UnexpectedToken {
            expected,
            found: tok.to_string(),
            line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASE_2022: &str = "\
NumTechnologies 2
Tech TA 2
LibCell C1 4 8 2
Pin P1 1 1
Pin P2 3 7
LibCell C2 6 8 3
Pin P1 1 1
Pin P2 3 3
Pin P3 5 7
Tech TB 2
LibCell C1 5 10 2
Pin P1 1 2
Pin P2 4 9
LibCell C2 8 10 3
Pin P1 1 1
Pin P2 4 4
Pin P3 7 9
DieSize 0 0 40 40
TopDieMaxUtil 80
BottomDieMaxUtil 90
TopDieRows 0 0 40 8 5
BottomDieRows 0 0 40 10 4
TopDieTech TA
BottomDieTech TB
TerminalSize 2 2
TerminalSpacing 1
NumInstances 3
Inst U1 C1
Inst U2 C2
Inst U3 C1
NumNets 2
Net N1 2
Pin U1/P2
Pin U2/P1
Net N2 3
Pin U2/P3
Pin U3/P1
Pin U1/P1
";

    #[test]
    fn detects_2023_by_terminal_cost() {
        assert_eq!(detect_format(CASE_2022), BenchFormat::Iccad2022);
        assert_eq!(detect_format("TerminalCost 4"), BenchFormat::Iccad2023);
    }

    #[test]
    fn parses_2022_case() {
        let (design, info) = parse_bench(CASE_2022).unwrap();
        assert_eq!(info.format, BenchFormat::Iccad2022);
        assert_eq!(info.die_area, Rect::new(0, 0, 40, 40));
        assert_eq!(info.dies[0].max_util, 80);
        assert_eq!(info.dies[1].tech, "TB");
        assert_eq!(info.terminal.spacing, 1);
        assert_eq!(info.terminal.cost, 0);

        // Root tech + one tech per die.
        assert_eq!(design.tech_count(), 3);
        let root = design.root_block();
        assert_eq!(root.insts.len(), 3);
        assert_eq!(root.nets.len(), 2);
        let n1 = root.find_net("N1").unwrap();
        assert_eq!(root.net(n1).term_count(), 2);
        let u1 = root.find_instance("U1").unwrap();
        assert!(root.net(n1).has_iterm(u1, "P2"));
    }

    #[test]
    fn last_pin_is_output() {
        let (design, _) = parse_bench(CASE_2022).unwrap();
        let tech = design.tech(design.root_block().tech);
        let c2 = tech.find_master("C2").unwrap();
        let master = tech.master(c2);
        assert_eq!(master.pins[0].direction, PinDirection::Input);
        assert_eq!(master.pins[2].direction, PinDirection::Output);
    }

    #[test]
    fn rows_follow_top_die_and_clamp_to_die() {
        let (design, _) = parse_bench(CASE_2022).unwrap();
        let root = design.root_block();
        // Narrowest instantiated master is C1 (width 4); 40/4 = 10 sites.
        // The fifth row would end at Y=40 which fits the 40-high die.
        assert_eq!(root.rows.len(), 5);
        assert_eq!(root.rows[0].site.width, 4);
        assert_eq!(root.rows[0].site_count, 10);
        assert_eq!(root.rows[1].origin.y, 8);
        assert_eq!(root.rows[0].orient, RowOrient::FlippedX);
    }

    #[test]
    fn parses_2023_macro_flags_and_cost() {
        let text = "\
NumTechnologies 1
Tech TA 2
LibCell N C1 4 8 1
Pin P1 1 1
LibCell Y M1 20 16 1
Pin P1 2 2
DieSize 0 0 40 40
TopDieMaxUtil 75
BottomDieMaxUtil 75
TopDieRows 0 0 40 8 5
BottomDieRows 0 0 40 8 5
TopDieTech TA
BottomDieTech TA
TerminalSize 2 2
TerminalSpacing 1
TerminalCost 4
NumInstances 1
Inst U1 C1
NumNets 0
";
        let (design, info) = parse_bench(text).unwrap();
        assert_eq!(info.format, BenchFormat::Iccad2023);
        assert_eq!(info.terminal.cost, 4);
        let tech = design.tech(design.root_block().tech);
        let m1 = tech.find_master("M1").unwrap();
        assert_eq!(tech.master(m1).kind, MasterKind::Block);
        let c1 = tech.find_master("C1").unwrap();
        assert_eq!(tech.master(c1).kind, MasterKind::Core);
    }

    #[test]
    fn unknown_instance_in_net_is_an_error() {
        let text = CASE_2022.replace("Pin U3/P1", "Pin UX/P1");
        let err = parse_bench(&text).unwrap_err();
        assert!(matches!(err, BenchError::UnknownInstance { .. }));
    }

    #[test]
    fn malformed_pin_reference_is_an_error() {
        let text = CASE_2022.replace("Pin U3/P1", "Pin U3P1");
        let err = parse_bench(&text).unwrap_err();
        assert!(matches!(err, BenchError::BadPinRef { .. }));
    }

    #[test]
    fn misplaced_keyword_reports_line() {
        let text = CASE_2022.replace("TopDieMaxUtil", "TopDieUtil");
        match parse_bench(&text).unwrap_err() {
            BenchError::UnexpectedToken {
                expected, found, ..
            } => {
                assert_eq!(expected, "TopDieMaxUtil");
                assert_eq!(found, "TopDieUtil");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn truncated_file_is_eof() {
        let text = "NumTechnologies 1\nTech TA 1\n";
        let err = parse_bench(text).unwrap_err();
        assert!(matches!(err, BenchError::UnexpectedEof { .. }));
    }
}
