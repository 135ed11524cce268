use pagekit_core::{
    Board, ContainerId, ContainerRole, InvariantViolation, ItemId, ItemRegistry, LayoutMode,
    LayoutRules, Render, ZoneEvent,
};
use proptest::prelude::*;

const ORIGIN: ContainerId = ContainerId(0);
const ZONE_A: ContainerId = ContainerId(1);
const ZONE_B: ContainerId = ContainerId(2);
const X: ItemId = ItemId(0);
const Y: ItemId = ItemId(1);
const Z: ItemId = ItemId(2);
const W: ItemId = ItemId(3);
const CONTAINERS: [ContainerId; 3] = [ORIGIN, ZONE_A, ZONE_B];
const ITEMS: [ItemId; 4] = [X, Y, Z, W];

fn build_board() -> Board {
    let registry = ItemRegistry::builder()
        .container(ORIGIN, ContainerRole::Origin)
        .container(ZONE_A, ContainerRole::Zone)
        .container(ZONE_B, ContainerRole::Zone)
        .item(X, ZONE_A)
        .item(Y, ZONE_A)
        .item(Z, ORIGIN)
        .item(W, ORIGIN)
        .build()
        .expect("valid page");
    Board::new(registry, LayoutRules::default()).expect("board")
}

fn drag(board: &mut Board, item: ItemId, target: ContainerId) -> Vec<Render> {
    board.drag_start(item).expect("drag start");
    board.zone_event(target, ZoneEvent::DragOver).expect("drag over");
    let outcome = board.zone_event(target, ZoneEvent::Drop).expect("drop");
    let mut renders = outcome.renders;
    renders.extend(board.drag_end().expect("drag end"));
    renders
}

fn drop_ticket(renders: &[Render]) -> Option<pagekit_core::DropTicket> {
    renders.iter().find_map(|render| match render {
        Render::ScheduleDropClear(ticket) => Some(*ticket),
        _ => None,
    })
}

fn assert_clean(board: &Board) {
    for id in board.registry().containers() {
        assert!(
            !board.container_view(id).unwrap().highlighted,
            "{id} left highlighted"
        );
    }
    for id in board.registry().items() {
        assert!(!board.item_view(*id).unwrap().dragging, "{id} left dragging");
    }
}

#[test]
fn move_between_zones_then_from_origin() {
    let mut board = build_board();
    assert_eq!(board.container_view(ZONE_A).unwrap().layout, LayoutMode::Row);
    assert_eq!(board.container_view(ZONE_B).unwrap().layout, LayoutMode::Single);

    drag(&mut board, X, ZONE_B);
    assert_eq!(board.registry().items_in(ZONE_A).unwrap(), &[Y]);
    assert_eq!(board.registry().items_in(ZONE_B).unwrap(), &[X]);
    assert_eq!(board.container_view(ZONE_A).unwrap().layout, LayoutMode::Single);
    assert_eq!(board.container_view(ZONE_B).unwrap().layout, LayoutMode::Single);
    assert!(board.container_view(ZONE_B).unwrap().has_items);

    let before_a = board.container_view(ZONE_A).unwrap();
    let renders = drag(&mut board, Z, ZONE_B);
    assert_eq!(board.registry().items_in(ZONE_B).unwrap(), &[X, Z]);
    assert_eq!(board.container_view(ZONE_B).unwrap().layout, LayoutMode::Row);
    assert_eq!(board.container_view(ZONE_A).unwrap(), before_a);
    assert_eq!(board.registry().items_in(ZONE_A).unwrap(), &[Y]);

    assert!(board.item_view(Z).unwrap().just_dropped);
    let ticket = drop_ticket(&renders).expect("drop schedules a clear");
    assert_eq!(ticket.item(), Z);
    assert_eq!(board.clear_dropped(ticket).unwrap(), vec![Render::Item(Z)]);
    assert!(!board.item_view(Z).unwrap().just_dropped);
    board.registry().check_partition().unwrap();
}

#[test]
fn drop_on_own_container_changes_nothing() {
    let mut board = build_board();
    board.drag_start(Y).unwrap();
    board.zone_event(ZONE_A, ZoneEvent::DragOver).unwrap();
    board.zone_event(ZONE_B, ZoneEvent::DragOver).unwrap();

    let registry_before: Vec<Vec<ItemId>> = board
        .registry()
        .containers()
        .map(|id| board.registry().items_in(id).unwrap().to_vec())
        .collect();
    let views_before: Vec<_> = board
        .registry()
        .containers()
        .map(|id| board.container_view(id).unwrap())
        .collect();

    let outcome = board.zone_event(ZONE_A, ZoneEvent::Drop).unwrap();
    assert!(outcome.prevent_default);
    assert!(!outcome
        .renders
        .iter()
        .any(|render| matches!(render, Render::Move { .. } | Render::ScheduleDropClear(_))));

    let registry_after: Vec<Vec<ItemId>> = board
        .registry()
        .containers()
        .map(|id| board.registry().items_in(id).unwrap().to_vec())
        .collect();
    assert_eq!(registry_before, registry_after);
    for (id, before) in board.registry().containers().zip(views_before) {
        let after = board.container_view(id).unwrap();
        assert_eq!(after.layout, before.layout);
        assert_eq!(after.has_items, before.has_items);
        if id != ZONE_A {
            assert_eq!(after.highlighted, before.highlighted);
        }
    }
    assert!(!board.item_view(Y).unwrap().just_dropped);
}

#[test]
fn cancelled_gesture_cleans_up() {
    let mut board = build_board();
    board.drag_start(W).unwrap();
    board.zone_event(ZONE_A, ZoneEvent::DragOver).unwrap();
    board.zone_event(ZONE_B, ZoneEvent::DragOver).unwrap();
    board
        .zone_event(
            ZONE_B,
            ZoneEvent::DragLeave {
                pointer_inside: true,
            },
        )
        .unwrap();
    assert!(board.container_view(ZONE_B).unwrap().highlighted);
    assert!(board.container_view(ZONE_A).unwrap().highlighted);

    let renders = board.drag_end().unwrap();
    assert!(renders.contains(&Render::Container(ZONE_A)));
    assert!(renders.contains(&Render::Container(ZONE_B)));
    assert!(renders.contains(&Render::Item(W)));
    assert_clean(&board);
    assert_eq!(board.registry().locate(W), Ok(ORIGIN));
    assert!(!board.session().is_open());
}

#[test]
fn drop_wins_over_racing_leave() {
    let mut board = build_board();
    board.drag_start(Z).unwrap();
    board.zone_event(ZONE_B, ZoneEvent::DragOver).unwrap();
    board
        .zone_event(
            ZONE_B,
            ZoneEvent::DragLeave {
                pointer_inside: false,
            },
        )
        .unwrap();
    board.zone_event(ZONE_B, ZoneEvent::Drop).unwrap();
    board
        .zone_event(
            ZONE_B,
            ZoneEvent::DragLeave {
                pointer_inside: false,
            },
        )
        .unwrap();
    board.drag_end().unwrap();
    assert_eq!(board.registry().locate(Z), Ok(ZONE_B));
    assert_clean(&board);
}

#[test]
fn drop_without_session_is_inert() {
    let mut board = build_board();
    board.zone_event(ZONE_B, ZoneEvent::DragOver).unwrap();
    let outcome = board.zone_event(ZONE_B, ZoneEvent::Drop).unwrap();
    assert!(outcome.prevent_default);
    assert_eq!(outcome.renders, vec![Render::Container(ZONE_B)]);
    assert!(!board.container_view(ZONE_B).unwrap().highlighted);
    board.registry().check_partition().unwrap();
}

#[test]
fn redundant_drag_over_is_idempotent() {
    let mut board = build_board();
    board.drag_start(Z).unwrap();
    board.zone_event(ZONE_A, ZoneEvent::DragOver).unwrap();
    let first = board.container_view(ZONE_A).unwrap();
    let first_style = board.presentation(ZONE_A).unwrap();
    board.zone_event(ZONE_A, ZoneEvent::DragOver).unwrap();
    assert_eq!(board.container_view(ZONE_A).unwrap(), first);
    assert_eq!(board.presentation(ZONE_A).unwrap(), first_style);
}

#[test]
fn moving_back_to_origin_restores_zone_state() {
    let mut board = build_board();
    drag(&mut board, X, ORIGIN);
    drag(&mut board, Y, ORIGIN);
    let zone = board.container_view(ZONE_A).unwrap();
    assert!(!zone.has_items);
    assert_eq!(zone.layout, LayoutMode::Single);
    let origin = board.container_view(ORIGIN).unwrap();
    assert!(!origin.has_items);
    assert_eq!(origin.layout, LayoutMode::Single);
    assert_eq!(board.registry().items_in(ORIGIN).unwrap(), &[Z, W, X, Y]);
}

#[test]
fn rejected_second_drop_leaves_state_untouched() {
    let mut board = build_board();
    board.drag_start(X).unwrap();
    board.zone_event(ZONE_B, ZoneEvent::Drop).unwrap();
    board.zone_event(ORIGIN, ZoneEvent::DragOver).unwrap();
    let origin_before = board.container_view(ORIGIN).unwrap();
    let zone_b_before = board.container_view(ZONE_B).unwrap();

    assert_eq!(
        board.zone_event(ORIGIN, ZoneEvent::Drop),
        Err(InvariantViolation::NotHeld {
            item: X,
            container: ZONE_A,
        })
    );
    assert_eq!(board.container_view(ORIGIN).unwrap(), origin_before);
    assert!(origin_before.highlighted);
    assert_eq!(board.container_view(ZONE_B).unwrap(), zone_b_before);
    assert_eq!(board.registry().locate(X), Ok(ZONE_B));
    board.registry().check_partition().unwrap();
}

#[test]
fn unknown_container_fails_fast() {
    let mut board = build_board();
    assert_eq!(
        board.zone_event(ContainerId(42), ZoneEvent::DragOver),
        Err(InvariantViolation::UnknownContainer(ContainerId(42)))
    );
    assert_eq!(
        board.drag_start(ItemId(42)),
        Err(InvariantViolation::UnknownItem(ItemId(42)))
    );
    assert!(!board.session().is_open());
}

#[derive(Clone, Debug)]
struct Gesture {
    item: ItemId,
    hovers: Vec<(ContainerId, ZoneEvent)>,
    drop_on: Option<ContainerId>,
}

fn container() -> impl Strategy<Value = ContainerId> {
    prop::sample::select(CONTAINERS.to_vec())
}

fn hover_event() -> impl Strategy<Value = ZoneEvent> {
    prop_oneof![
        Just(ZoneEvent::DragOver),
        any::<bool>().prop_map(|pointer_inside| ZoneEvent::DragLeave { pointer_inside }),
    ]
}

fn gesture() -> impl Strategy<Value = Gesture> {
    (
        prop::sample::select(ITEMS.to_vec()),
        prop::collection::vec((container(), hover_event()), 0..5),
        prop::option::of(container()),
    )
        .prop_map(|(item, hovers, drop_on)| Gesture {
            item,
            hovers,
            drop_on,
        })
}

proptest! {
    #[test]
    fn partition_and_cleanup_hold_over_gesture_runs(
        gestures in prop::collection::vec(gesture(), 1..40)
    ) {
        let mut board = build_board();
        for gesture in gestures {
            board.drag_start(gesture.item).unwrap();
            for (container, event) in gesture.hovers {
                board.zone_event(container, event).unwrap();
            }
            if let Some(target) = gesture.drop_on {
                board.zone_event(target, ZoneEvent::Drop).unwrap();
            }
            board.drag_end().unwrap();

            prop_assert!(board.registry().check_partition().is_ok());
            prop_assert!(!board.session().is_open());
            for id in CONTAINERS {
                let view = board.container_view(id).unwrap();
                prop_assert!(!view.highlighted, "{} left highlighted", id);
                let count = board.registry().item_count(id).unwrap();
                prop_assert_eq!(view.layout, board.rules().mode_for(count));
            }
            for id in ITEMS {
                prop_assert!(!board.item_view(id).unwrap().dragging, "{} left dragging", id);
            }
            let total: usize = CONTAINERS
                .iter()
                .map(|id| board.registry().item_count(*id).unwrap())
                .sum();
            prop_assert_eq!(total, ITEMS.len());
        }
    }
}
