//! Script replay command.

use std::path::Path;
use std::rc::Rc;

use serde::Serialize;
use tabstrip_core::tracing::span_names;
use tabstrip_core::{
    AddTypes, CloseTypes, DefaultDelegate, GroupId, TabContents, TabGroupVisualData,
    TabStripModel, TabStripSettings, trace_operation,
};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::script::{Script, Step};
use crate::transcript::{self, TabRow, Transcript};
use crate::util::{load_settings, read_input};

/// One step of the JSON transcript.
#[derive(Debug, Serialize)]
struct StepReport<'a> {
    step: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    op: Option<&'a Step>,
    events: Vec<String>,
    tabs: Vec<TabRow>,
}

/// Options of the replay command
pub struct ReplayOptions<'a> {
    pub script: &'a Path,
    pub format: OutputFormat,
    pub settings: Option<&'a Path>,
    pub summary: bool,
    pub quiet: bool,
}

/// Replay a script and print the strip after every step
pub fn cmd_replay(config_path: Option<&Path>, options: &ReplayOptions<'_>) -> Result<(), CliError> {
    let settings = load_settings(config_path, options.settings)?;
    let script = Script::parse(&read_input(options.script)?)?;

    let _span = trace_operation!(span_names::REPLAY, steps = script.steps.len()).entered();
    let model = TabStripModel::with_settings(Rc::new(DefaultDelegate), settings.clone());
    for (i, url) in script.tabs.iter().enumerate() {
        model.append_tab(TabContents::new(url.as_str()), i == 0);
    }
    let transcript = Rc::new(Transcript::default());
    model.add_observer(transcript.clone());

    let verbose = !options.summary && !options.quiet;
    if verbose {
        report(&model, &transcript, 0, None, options.format)?;
    }
    for (i, step) in script.steps.iter().enumerate() {
        let number = i + 1;
        tracing::debug!(step = number, ?step, "Applying step");
        apply(&model, &settings, step).map_err(|message| CliError::Step {
            step: number,
            message,
        })?;
        if verbose {
            report(&model, &transcript, number, Some(step), options.format)?;
        } else {
            transcript.drain();
        }
    }
    if !verbose && !options.quiet {
        report(&model, &transcript, script.steps.len(), None, options.format)?;
    }
    tracing::info!(steps = script.steps.len(), tabs = model.count(), "Replay finished");
    Ok(())
}

fn report(
    model: &TabStripModel,
    transcript: &Transcript,
    number: usize,
    step: Option<&Step>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let events = transcript.drain();
    let tabs = transcript::rows(model, &mut transcript.labels().borrow_mut());
    match format {
        OutputFormat::Json => {
            let report = StepReport {
                step: number,
                op: step,
                events,
                tabs,
            };
            println!("{}", serde_json::to_string(&report)?);
        }
        OutputFormat::Text => {
            match step {
                Some(step) => println!("#{number} {}", serde_json::to_string(step)?),
                None => println!("#{number}"),
            }
            for event in &events {
                println!("  ~ {event}");
            }
            println!("  {}", transcript::render(model, &tabs));
        }
    }
    Ok(())
}

fn tab_index(model: &TabStripModel, index: usize) -> Result<usize, String> {
    if model.contains_index(index) {
        Ok(index)
    } else {
        Err(format!("index {index} out of range (count {})", model.count()))
    }
}

fn tab_indices(model: &TabStripModel, indices: &[usize]) -> Result<Vec<usize>, String> {
    if indices.is_empty() {
        return Err("no tabs given".to_string());
    }
    let mut checked = indices
        .iter()
        .map(|&index| tab_index(model, index))
        .collect::<Result<Vec<_>, _>>()?;
    checked.sort_unstable();
    checked.dedup();
    Ok(checked)
}

fn group_of(model: &TabStripModel, index: usize) -> Result<GroupId, String> {
    let index = tab_index(model, index)?;
    model
        .group_for_tab(index)
        .ok_or_else(|| format!("tab {index} is not in a group"))
}

fn require_groups(settings: &TabStripSettings) -> Result<(), String> {
    if settings.tab_groups_enabled {
        Ok(())
    } else {
        Err("tab groups are disabled".to_string())
    }
}

fn apply(model: &TabStripModel, settings: &TabStripSettings, step: &Step) -> Result<(), String> {
    match step {
        Step::Open {
            url,
            index,
            transition,
            foreground,
            pinned,
        } => {
            let mut add_types = AddTypes::NONE;
            if *foreground {
                add_types |= AddTypes::ACTIVE;
            }
            if *pinned {
                add_types |= AddTypes::PINNED;
            }
            if index.is_some() {
                add_types |= AddTypes::FORCE_INDEX;
            }
            model.add_tab(
                TabContents::new(url.as_str()),
                *index,
                (*transition).into(),
                add_types,
                None,
            );
        }
        Step::Close { index } => {
            model.close_tab_at(tab_index(model, *index)?, CloseTypes::USER_GESTURE);
        }
        Step::CloseSelected => {
            model.close_selected_tabs();
        }
        Step::CloseAll => {
            model.close_all_tabs();
        }
        Step::Replace { index, url } => {
            model.replace_contents_at(tab_index(model, *index)?, TabContents::new(url.as_str()));
        }
        Step::Activate { index, gesture } => {
            model.activate_tab_at(tab_index(model, *index)?, *gesture);
        }
        Step::Toggle { index } => {
            model.toggle_selection_at(tab_index(model, *index)?);
        }
        Step::Extend { index } => model.extend_selection_to(tab_index(model, *index)?),
        Step::SelectNext => model.select_next_tab(true),
        Step::SelectPrevious => model.select_previous_tab(true),
        Step::Move { index, to } => {
            let index = tab_index(model, *index)?;
            model.move_tab_to(index, tab_index(model, *to)?, false);
        }
        Step::MoveSelected { to } => {
            model.move_selected_tabs_to(tab_index(model, *to)?, None);
        }
        Step::MoveNext => model.move_tab_next(),
        Step::MovePrevious => model.move_tab_previous(),
        Step::Pin { index, pinned } => {
            model.set_tab_pinned(tab_index(model, *index)?, *pinned);
        }
        Step::Block { index, blocked } => {
            model.set_tab_blocked(tab_index(model, *index)?, *blocked);
        }
        Step::Group { indices, title } => {
            require_groups(settings)?;
            let indices = tab_indices(model, indices)?;
            let visual = title.as_ref().map(|title| {
                let mut visual = TabGroupVisualData::default();
                visual.title.clone_from(title);
                visual
            });
            model.add_to_new_group_with(&indices, GroupId::new(), visual);
        }
        Step::Join { indices, group_of: of } => {
            require_groups(settings)?;
            let group = group_of(model, *of)?;
            model.add_to_existing_group(&tab_indices(model, indices)?, group, true);
        }
        Step::Ungroup { indices } => model.remove_from_group(&tab_indices(model, indices)?),
        Step::Collapse {
            group_of: of,
            collapsed,
        } => {
            let group = group_of(model, *of)?;
            let visual = model
                .group(group)
                .map(|g| g.visual_data().clone())
                .unwrap_or_default()
                .with_collapsed(*collapsed);
            model.change_group_visuals(group, visual);
        }
        Step::MoveGroup { group_of: of, to } => {
            let group = group_of(model, *of)?;
            model.move_group_to(group, tab_index(model, *to)?);
        }
        Step::Split { indices } => {
            let indices = tab_indices(model, indices)?;
            model
                .add_to_new_split(&indices, None)
                .map_err(|e| e.to_string())?;
        }
        Step::Unsplit { index } => {
            let index = tab_index(model, *index)?;
            let split = model
                .split_for_tab(index)
                .ok_or_else(|| format!("tab {index} is not in a split"))?;
            model.remove_split(split).map_err(|e| e.to_string())?;
        }
        Step::Menu { index, command } => {
            let index = tab_index(model, *index)?;
            if !model.is_context_menu_command_enabled(index, *command) {
                return Err(format!("{command:?} is not available for tab {index}"));
            }
            model.execute_context_menu_command(index, *command);
        }
    }
    Ok(())
}
