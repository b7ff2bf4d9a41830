use crate::dataset::{Dataset, parse_dataset_file};
use crate::directive::{ABSENT_FILE, Directive, lex};
use crate::error::{PlotError, Result};
use crate::field::{self, FieldSelector, LineFlags};
use crate::plot::{DEFAULT_TITLE, PlotSpec};
use log::{debug, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Datasets loaded during one invocation, keyed by the path as given.
/// The first load of a path wins; later references share it.
#[derive(Debug, Default)]
pub struct DatasetCache {
    loaded: HashMap<PathBuf, Rc<Dataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&mut self, path: &Path) -> Result<Rc<Dataset>> {
        if let Some(data) = self.loaded.get(path) {
            debug!("reusing {}", path.display());
            return Ok(Rc::clone(data));
        }
        let data = Rc::new(parse_dataset_file(path)?);
        debug!(
            "cached {} as {:?} ({} frames)",
            data.path().display(),
            data.title(),
            data.len()
        );
        self.loaded.insert(path.to_path_buf(), Rc::clone(&data));
        Ok(data)
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }
}

/// Accumulates one chart group.
///
/// Drop/right flags are pending until the next field directive, which
/// consumes and resets them. Scalars are last-write-wins.
#[derive(Debug, Default)]
struct GroupState {
    pending: LineFlags,
    fields: Vec<FieldSelector>,
    files: Vec<String>,
    cycle_length: Option<usize>,
    frames: Option<usize>,
    offset: Option<usize>,
    output: Option<PathBuf>,
    title: Option<String>,
}

fn overwrite<T: std::fmt::Debug>(graph: usize, what: &str, slot: &mut Option<T>, value: T) {
    if let Some(prev) = slot.as_ref() {
        warn!(
            "graph #{}: {} given more than once, {:?} replaces {:?}",
            graph, what, value, prev
        );
    }
    *slot = Some(value);
}

/// Zero disables cycle averaging and the frame cap.
fn nonzero(what: &str, graph: usize, value: usize) -> Option<usize> {
    if value == 0 {
        debug!("graph #{}: {} 0 disables it", graph, what);
        None
    } else {
        Some(value)
    }
}

impl GroupState {
    fn apply(&mut self, graph: usize, directive: &Directive) -> Result<()> {
        match directive {
            Directive::CycleLength(n) => {
                if let Some(n) = nonzero("cycle length", graph, *n) {
                    overwrite(graph, "cycle length", &mut self.cycle_length, n);
                } else {
                    self.cycle_length = None;
                }
            }
            Directive::Frames(n) => {
                if let Some(n) = nonzero("frame count", graph, *n) {
                    overwrite(graph, "frame count", &mut self.frames, n);
                } else {
                    self.frames = None;
                }
            }
            Directive::Offset(n) => overwrite(graph, "offset", &mut self.offset, *n),
            Directive::Output(path) => {
                overwrite(graph, "output file", &mut self.output, path.clone())
            }
            Directive::Title(title) => overwrite(graph, "title", &mut self.title, title.clone()),
            Directive::Drop => self.pending.hide_dropped = true,
            Directive::Right => self.pending.right_axis = true,
            Directive::Field(name) => {
                let flags = std::mem::take(&mut self.pending);
                let selector = match field::resolve_arg(name)? {
                    Some(id) => FieldSelector::new(id, flags),
                    None => FieldSelector::skip(),
                };
                self.fields.push(selector);
            }
            Directive::File(path) => self.files.push(path.clone()),
        }
        Ok(())
    }

    fn into_spec(self, graph: usize, cache: &mut DatasetCache) -> Result<PlotSpec> {
        if self.files.is_empty() {
            return Err(PlotError::config(graph, "missing file argument(s)"));
        }
        if self.fields.is_empty() {
            return Err(PlotError::config(graph, "missing field argument(s)"));
        }
        if !self.pending.is_empty() {
            warn!("graph #{}: -d/-r after the last field are ignored", graph);
        }

        let mut datasets = Vec::with_capacity(self.files.len());
        for file in &self.files {
            if file == ABSENT_FILE {
                datasets.push(None);
            } else {
                datasets.push(Some(cache.get_or_load(Path::new(file))?));
            }
        }

        let mut spec = PlotSpec::new(graph, self.fields, datasets);
        spec.cycle_length = self.cycle_length;
        spec.frames = self.frames;
        spec.offset = self.offset.unwrap_or(0);
        spec.output = self.output;
        spec.title = self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string());
        Ok(spec)
    }
}

/// Fold one group of directives into a plot specification.
pub fn plot_spec_from_directives(
    graph: usize,
    directives: &[Directive],
    cache: &mut DatasetCache,
) -> Result<PlotSpec> {
    let mut state = GroupState::default();
    for directive in directives {
        state.apply(graph, directive)?;
    }
    state.into_spec(graph, cache)
}

/// Build one plot specification per `--next`-separated group of raw args.
pub fn plot_specs_from_args(args: &[String], cache: &mut DatasetCache) -> Result<Vec<PlotSpec>> {
    lex::split_groups(args)
        .into_iter()
        .enumerate()
        .map(|(graph, group)| {
            let directives = lex::lex_group(graph, group)?;
            plot_spec_from_directives(graph, &directives, cache)
        })
        .collect()
}
