//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Select};

use crate::pipeline::{SelectionState, Table};

const NONE_LABEL: &str = "(none)";

/// One entry of the interactive menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ChangeNumeric,
    ChangeNumericHue,
    ChangeCategorical,
    ChangeCategoricalHue,
    Quit,
}

impl MenuAction {
    const ALL: [MenuAction; 5] = [
        MenuAction::ChangeNumeric,
        MenuAction::ChangeNumericHue,
        MenuAction::ChangeCategorical,
        MenuAction::ChangeCategoricalHue,
        MenuAction::Quit,
    ];

    fn label(&self, selection: &SelectionState) -> String {
        let current = |v: &Option<String>| v.clone().unwrap_or_else(|| NONE_LABEL.to_string());
        match self {
            MenuAction::ChangeNumeric => {
                format!("Numeric column      [{}]", current(&selection.numeric))
            }
            MenuAction::ChangeNumericHue => {
                format!("Numeric hue         [{}]", current(&selection.numeric_hue))
            }
            MenuAction::ChangeCategorical => {
                format!("Categorical column  [{}]", current(&selection.categorical))
            }
            MenuAction::ChangeCategoricalHue => {
                format!("Categorical hue     [{}]", current(&selection.categorical_hue))
            }
            MenuAction::Quit => "Quit".to_string(),
        }
    }
}

/// Ask which selection to change next.
pub fn select_action(selection: &SelectionState) -> Result<MenuAction> {
    let labels: Vec<String> = MenuAction::ALL.iter().map(|a| a.label(selection)).collect();
    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Change a selection")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(MenuAction::ALL[index])
}

/// Pick one of `options`, or none. The current value is preselected.
pub fn select_column(
    prompt: &str,
    options: &[String],
    current: Option<&str>,
) -> Result<Option<String>> {
    let mut items = vec![NONE_LABEL.to_string()];
    items.extend(options.iter().cloned());

    let default = current
        .and_then(|c| options.iter().position(|o| o == c))
        .map_or(0, |i| i + 1);

    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&items)
        .default(default)
        .interact()?;

    Ok(index.checked_sub(1).map(|i| options[i].clone()))
}

/// Run one round of the menu. Returns `None` when the user quits.
pub fn prompt_next_selection(
    table: &Table,
    selection: &SelectionState,
) -> Result<Option<SelectionState>> {
    let numeric = table.numeric_columns();
    let categorical = table.categorical_columns();

    let next = match select_action(selection)? {
        MenuAction::ChangeNumeric => {
            let column =
                select_column("Numeric column", &numeric, selection.numeric.as_deref())?;
            selection.clone().with_numeric(column)
        }
        MenuAction::ChangeNumericHue => {
            let hue = select_column(
                "Hue for the numeric plots",
                &categorical,
                selection.numeric_hue.as_deref(),
            )?;
            selection.clone().with_numeric_hue(hue)
        }
        MenuAction::ChangeCategorical => {
            let column = select_column(
                "Categorical column",
                &categorical,
                selection.categorical.as_deref(),
            )?;
            selection.clone().with_categorical(column)
        }
        MenuAction::ChangeCategoricalHue => {
            let hue = select_column(
                "Hue for the count plot",
                &categorical,
                selection.categorical_hue.as_deref(),
            )?;
            selection.clone().with_categorical_hue(hue)
        }
        MenuAction::Quit => return Ok(None),
    };
    Ok(Some(next))
}
