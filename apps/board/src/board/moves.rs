use crate::models::application::{Application, Stage, StageTag};

/// A position on the board: a stage column and an index inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub stage: Stage,
    pub index: usize,
}

/// A completed drag gesture. `destination` is `None` when the drop landed
/// outside every column (drag cancelled).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropEvent {
    pub application_id: i64,
    pub source: Slot,
    pub destination: Option<Slot>,
}

impl DropEvent {
    pub fn is_cancelled(&self) -> bool {
        self.destination.is_none()
    }

    /// Dropped back on the exact slot it came from.
    pub fn is_same_slot(&self) -> bool {
        self.destination == Some(self.source)
    }
}

/// Returns a new list with card `id` moved into `stage`, placed at `index`
/// within that column. The input is left untouched.
///
/// Placement: before the card currently at `index` of the destination column
/// (computed without the moved card); after the column's last card when
/// `index` is past the end; at the card's old list position when the column
/// is empty. Returns `None` when `id` is not in the list.
pub fn apply_move(
    applications: &[Application],
    id: i64,
    stage: Stage,
    index: usize,
) -> Option<Vec<Application>> {
    let from = applications.iter().position(|app| app.id == id)?;

    let mut next = applications.to_vec();
    let mut card = next.remove(from);
    card.stage = StageTag::Known(stage);

    let members: Vec<usize> = next
        .iter()
        .enumerate()
        .filter(|(_, app)| app.stage.is(stage))
        .map(|(pos, _)| pos)
        .collect();

    let at = match members.get(index) {
        Some(&pos) => pos,
        None => members.last().map(|&pos| pos + 1).unwrap_or(from),
    };

    next.insert(at, card);
    Some(next)
}

/// Puts card `id` back to `stage` at list position `list_index` (clamped),
/// leaving every other record as it is in `applications`.
pub fn restore_record(
    applications: &[Application],
    id: i64,
    stage: &StageTag,
    list_index: usize,
) -> Option<Vec<Application>> {
    let from = applications.iter().position(|app| app.id == id)?;

    let mut next = applications.to_vec();
    let mut card = next.remove(from);
    card.stage = stage.clone();
    let at = list_index.min(next.len());
    next.insert(at, card);
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::grouping::locate;
    use proptest::prelude::*;

    fn make_app(id: i64, stage: Stage) -> Application {
        Application {
            id,
            candidate_name: format!("Candidate {id}"),
            job_title: "Engineer".to_string(),
            stage: StageTag::Known(stage),
            score: Some(50),
            updated_at: None,
        }
    }

    fn ids_and_stages(apps: &[Application]) -> Vec<(i64, &str)> {
        apps.iter().map(|a| (a.id, a.stage.as_str())).collect()
    }

    #[test]
    fn test_move_to_empty_column_keeps_list_position() {
        let apps = vec![make_app(1, Stage::Applied), make_app(2, Stage::Interview)];

        let next = apply_move(&apps, 1, Stage::Screening, 0).unwrap();

        assert_eq!(
            ids_and_stages(&next),
            vec![(1, "Screening"), (2, "Interview")]
        );
        // input untouched
        assert_eq!(apps[0].stage, StageTag::Known(Stage::Applied));
    }

    #[test]
    fn test_move_inserts_before_card_at_index() {
        let apps = vec![
            make_app(1, Stage::Applied),
            make_app(2, Stage::Interview),
            make_app(3, Stage::Interview),
        ];

        let next = apply_move(&apps, 1, Stage::Interview, 1).unwrap();

        assert_eq!(ids_and_stages(&next), vec![(2, "Interview"), (1, "Interview"), (3, "Interview")]);
        assert_eq!(
            locate(&next, 1),
            Some(Slot {
                stage: Stage::Interview,
                index: 1
            })
        );
    }

    #[test]
    fn test_index_past_end_appends_to_column() {
        let apps = vec![
            make_app(1, Stage::Offer),
            make_app(2, Stage::Applied),
            make_app(3, Stage::Offer),
            make_app(4, Stage::Hired),
        ];

        let next = apply_move(&apps, 2, Stage::Offer, 99).unwrap();

        assert_eq!(
            ids_and_stages(&next),
            vec![(1, "Offer"), (3, "Offer"), (2, "Offer"), (4, "Hired")]
        );
    }

    #[test]
    fn test_reorder_within_column() {
        let apps = vec![
            make_app(1, Stage::Applied),
            make_app(2, Stage::Applied),
            make_app(3, Stage::Applied),
        ];

        let to_end = apply_move(&apps, 1, Stage::Applied, 2).unwrap();
        assert_eq!(to_end.iter().map(|a| a.id).collect::<Vec<_>>(), vec![2, 3, 1]);

        let to_front = apply_move(&apps, 3, Stage::Applied, 0).unwrap();
        assert_eq!(to_front.iter().map(|a| a.id).collect::<Vec<_>>(), vec![3, 1, 2]);
    }

    #[test]
    fn test_backward_move_is_allowed() {
        let apps = vec![make_app(5, Stage::Interview)];
        let next = apply_move(&apps, 5, Stage::Applied, 0).unwrap();
        assert_eq!(next[0].stage, StageTag::Known(Stage::Applied));
    }

    #[test]
    fn test_unknown_id_returns_none() {
        let apps = vec![make_app(1, Stage::Applied)];
        assert!(apply_move(&apps, 42, Stage::Hired, 0).is_none());
    }

    #[test]
    fn test_move_preserves_id_set() {
        let apps = vec![
            make_app(1, Stage::Applied),
            make_app(2, Stage::Screening),
            make_app(3, Stage::Hired),
        ];
        let next = apply_move(&apps, 2, Stage::Hired, 0).unwrap();
        let mut before: Vec<i64> = apps.iter().map(|a| a.id).collect();
        let mut after: Vec<i64> = next.iter().map(|a| a.id).collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn test_restore_record_returns_card_to_old_position() {
        let apps = vec![
            make_app(2, Stage::Screening),
            make_app(1, Stage::Screening),
            make_app(3, Stage::Offer),
        ];
        let next = restore_record(&apps, 1, &StageTag::Known(Stage::Applied), 0).unwrap();
        assert_eq!(
            ids_and_stages(&next),
            vec![(1, "Applied"), (2, "Screening"), (3, "Offer")]
        );

        let clamped = restore_record(&apps, 2, &StageTag::Known(Stage::Hired), 50).unwrap();
        assert_eq!(clamped.last().unwrap().id, 2);
    }

    #[test]
    fn test_drop_event_predicates() {
        let source = Slot {
            stage: Stage::Applied,
            index: 0,
        };
        let cancelled = DropEvent {
            application_id: 1,
            source,
            destination: None,
        };
        assert!(cancelled.is_cancelled());
        assert!(!cancelled.is_same_slot());

        let same = DropEvent {
            destination: Some(source),
            ..cancelled
        };
        assert!(same.is_same_slot());

        let shifted = DropEvent {
            destination: Some(Slot {
                stage: Stage::Applied,
                index: 1,
            }),
            ..cancelled
        };
        assert!(!shifted.is_same_slot());
    }

    proptest! {
        #[test]
        fn prop_apply_move_changes_only_the_target(
            codes in prop::collection::vec(0usize..5, 1..30),
            target in any::<prop::sample::Index>(),
            stage_code in 0usize..5,
            index in 0usize..35,
        ) {
            let apps: Vec<Application> = codes
                .iter()
                .enumerate()
                .map(|(i, &code)| make_app(i as i64 + 1, Stage::ALL[code]))
                .collect();
            let id = apps[target.index(apps.len())].id;
            let stage = Stage::ALL[stage_code];

            let next = apply_move(&apps, id, stage, index).unwrap();

            let before_ids: Vec<i64> = apps.iter().map(|a| a.id).collect();
            let mut after_ids: Vec<i64> = next.iter().map(|a| a.id).collect();
            after_ids.sort();
            prop_assert_eq!(before_ids, after_ids);

            for app in &next {
                if app.id == id {
                    prop_assert!(app.stage.is(stage));
                } else {
                    let original = apps.iter().find(|a| a.id == app.id).unwrap();
                    prop_assert_eq!(&app.stage, &original.stage);
                }
            }

            let others = |list: &[Application]| -> Vec<i64> {
                list.iter().filter(|a| a.id != id).map(|a| a.id).collect()
            };
            prop_assert_eq!(others(&apps), others(&next));

            let column_len = apps
                .iter()
                .filter(|a| a.id != id && a.stage.is(stage))
                .count();
            prop_assert_eq!(
                locate(&next, id),
                Some(Slot { stage, index: index.min(column_len) })
            );
        }
    }
}
