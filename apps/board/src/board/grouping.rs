use crate::board::moves::Slot;
use crate::models::application::{Application, Stage};

/// One rendered column: a stage and its cards in working-list order.
#[derive(Debug, Clone)]
pub struct Column<'a> {
    pub stage: Stage,
    pub cards: Vec<&'a Application>,
}

impl Column<'_> {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Partitions `applications` into the five stage columns, in stage order.
/// Records whose stage is unrecognized appear in no column.
pub fn group_by_stage(applications: &[Application]) -> Vec<Column<'_>> {
    Stage::ALL
        .into_iter()
        .map(|stage| Column {
            stage,
            cards: cards_in(applications, stage).collect(),
        })
        .collect()
}

pub fn cards_in(
    applications: &[Application],
    stage: Stage,
) -> impl Iterator<Item = &Application> + '_ {
    applications.iter().filter(move |app| app.stage.is(stage))
}

/// Number of records not shown in any column.
pub fn hidden_count(applications: &[Application]) -> usize {
    applications
        .iter()
        .filter(|app| app.stage.known().is_none())
        .count()
}

/// Current slot of a card, or `None` if it is absent or hidden.
pub fn locate(applications: &[Application], id: i64) -> Option<Slot> {
    let app = applications.iter().find(|app| app.id == id)?;
    let stage = app.stage.known()?;
    let index = cards_in(applications, stage).position(|app| app.id == id)?;
    Some(Slot { stage, index })
}
