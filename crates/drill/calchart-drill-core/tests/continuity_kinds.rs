use calchart_drill_core::continuity::{
    compile_continuities, CounterMarch, Diagonal, DiagonalOrder, Even, FollowLeader, ForwardMarch,
    Fountain, FountainOrder, GateTurn, Stop, TwoStep,
};
use calchart_drill_core::{
    compile_show, CardinalDirection, Compiled, Config, Continuity, ContinuityError,
    ContinuityKind, DotId, DotType, Ending, IssueKind, MovementCommand, Orientation, SheetEnv,
    SheetId, Show, ShowModel, StepCoordinate,
};

fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn at(x: f64, y: f64) -> StepCoordinate {
    StepCoordinate::new(x, y)
}

/// Show with one working sheet of `beats` beats and a short closing sheet.
/// `spots` are (dot, start, end) triples.
fn show_with(beats: u32, spots: &[(&str, StepCoordinate, StepCoordinate)]) -> (Show, SheetId) {
    let mut show = Show::new("kinds");
    let first = show.add_sheet("1", beats);
    let second = show.add_sheet("2", 4);
    for (name, start, end) in spots {
        let dot = DotId::from(*name);
        show.add_dot(dot.clone(), *name).expect("add dot");
        show.place(first, &dot, start.x(), start.y(), DotType::Plain)
            .expect("place start");
        show.place(second, &dot, end.x(), end.y(), DotType::Plain)
            .expect("place end");
    }
    (show, first)
}

fn add(show: &mut Show, sheet: SheetId, kind: impl Into<ContinuityKind>) {
    show.add_continuity(sheet, Continuity::new(DotType::Plain, kind))
        .expect("add continuity");
}

fn compile(show: &Show, sheet: SheetId, dot: &str) -> Result<Compiled, ContinuityError> {
    let dot = DotId::from(dot);
    let env = SheetEnv::new(show, sheet);
    let start = show.position_in_sheet(sheet, &dot).expect("dot is placed");
    let ctx = calchart_drill_core::CompileContext::new(start, show.sheet_beats(sheet));
    compile_continuities(show.continuities(sheet, DotType::Plain), &dot, ctx, &env)
}

fn texts(compiled: &Compiled) -> Vec<String> {
    compiled
        .commands
        .iter()
        .map(MovementCommand::continuity_text)
        .collect()
}

fn durations(compiled: &Compiled) -> Vec<u32> {
    compiled.commands.iter().map(|c| c.duration()).collect()
}

#[test]
fn forward_march_goes_a_fixed_distance() {
    let (mut show, sheet) = show_with(8, &[("A", at(0.0, 0.0), at(0.0, 4.0))]);
    add(&mut show, sheet, ForwardMarch::new(4, CardinalDirection::East));
    let out = compile(&show, sheet, "A").expect("fm compiles");
    assert_eq!(texts(&out), vec!["Move 4 E"]);
    assert_eq!(out.context.position, at(0.0, 4.0));
    assert_eq!(out.context.remaining, 4);
    approx(out.commands[0].orientation(), 0.0, 1e-9);
}

#[test]
fn forward_march_honours_beats_per_step_and_budget() {
    let (mut show, sheet) = show_with(8, &[("A", at(0.0, 0.0), at(4.0, 0.0))]);
    show.add_continuity(
        sheet,
        Continuity::new(DotType::Plain, ForwardMarch::new(4, CardinalDirection::North))
            .with_beats_per_step(2),
    )
    .expect("add fm");
    let out = compile(&show, sheet, "A").expect("fm compiles");
    assert_eq!(durations(&out), vec![8]);
    assert_eq!(texts(&out), vec!["Move 4 N"]);
    assert_eq!(out.context.position, at(4.0, 0.0));

    let (mut short, sheet) = show_with(6, &[("A", at(0.0, 0.0), at(0.0, 6.0))]);
    add(&mut short, sheet, ForwardMarch::new(10, CardinalDirection::East));
    let out = compile(&short, sheet, "A").expect("fm compiles");
    assert_eq!(durations(&out), vec![6]);
    assert_eq!(out.context.position, at(0.0, 6.0));
}

#[test]
fn even_spreads_the_move_over_the_sheet() {
    let (mut show, sheet) = show_with(8, &[("A", at(0.0, 0.0), at(4.0, 8.0))]);
    add(&mut show, sheet, Even::default());
    let out = compile(&show, sheet, "A").expect("even compiles");
    assert_eq!(texts(&out), vec!["Even 8 E, 4 N (8 steps)"]);
    assert_eq!(out.context.remaining, 0);
    assert_eq!(out.context.position, at(4.0, 8.0));
}

#[test]
fn fountain_covers_one_axis_at_a_time() {
    let spots = [("A", at(0.0, 0.0), at(4.0, 6.0))];
    let (mut show, sheet) = show_with(16, &spots);
    add(&mut show, sheet, Fountain::new(FountainOrder::EWNS, Ending::MT));
    let out = compile(&show, sheet, "A").expect("fountain compiles");
    assert_eq!(texts(&out), vec!["Move 6 E", "Move 4 N", "MT 6 E"]);
    assert_eq!(out.commands[0].end_position(), at(0.0, 6.0));

    let (mut show, sheet) = show_with(16, &spots);
    add(&mut show, sheet, Fountain::new(FountainOrder::NSEW, Ending::CL));
    let out = compile(&show, sheet, "A").expect("fountain compiles");
    assert_eq!(texts(&out), vec!["Move 4 N", "Move 6 E", "Close"]);
    assert_eq!(out.commands[0].end_position(), at(4.0, 0.0));
    assert_eq!(out.context.position, at(4.0, 6.0));
}

#[test]
fn diagonal_leg_before_or_after_the_straight_one() {
    let spots = [("A", at(0.0, 0.0), at(4.0, 6.0))];
    let (mut show, sheet) = show_with(16, &spots);
    add(&mut show, sheet, Diagonal::new(DiagonalOrder::DMHS, Ending::MT));
    let out = compile(&show, sheet, "A").expect("diagonal compiles");
    assert_eq!(texts(&out), vec!["Move 4 NE", "Move 2 E", "MT 10 E"]);
    assert_eq!(out.commands[0].end_position(), at(4.0, 4.0));

    let (mut show, sheet) = show_with(16, &spots);
    add(&mut show, sheet, Diagonal::new(DiagonalOrder::HSDM, Ending::MT));
    let out = compile(&show, sheet, "A").expect("diagonal compiles");
    assert_eq!(texts(&out), vec!["Move 2 E", "Move 4 NE", "MT 10 E"]);
    assert_eq!(out.commands[0].end_position(), at(0.0, 2.0));
    assert_eq!(out.context.position, at(4.0, 6.0));
}

#[test]
fn gate_turn_swings_about_the_reference() {
    let (mut show, sheet) = show_with(12, &[("A", at(0.0, 4.0), at(-4.0, 0.0))]);
    add(&mut show, sheet, GateTurn::new(90.0, true, at(0.0, 0.0)));
    let out = compile(&show, sheet, "A").expect("gate compiles");
    assert_eq!(texts(&out), vec!["GT CW 90 deg. (12 steps)"]);
    let end = out.context.position;
    approx(end.x(), -4.0, 1e-9);
    approx(end.y(), 0.0, 1e-9);
    assert_eq!(out.context.remaining, 0);
}

fn square() -> [(&'static str, StepCoordinate, StepCoordinate); 4] {
    [
        ("A", at(0.0, 0.0), at(0.0, 4.0)),
        ("B", at(0.0, 4.0), at(4.0, 4.0)),
        ("C", at(4.0, 4.0), at(4.0, 0.0)),
        ("D", at(4.0, 0.0), at(0.0, 0.0)),
    ]
}

fn ids(names: &[&str]) -> Vec<DotId> {
    names.iter().map(|n| DotId::from(*n)).collect()
}

#[test]
fn counter_march_walks_the_loop_for_its_duration() {
    let (mut show, sheet) = show_with(16, &square());
    add(
        &mut show,
        sheet,
        CounterMarch::new(ids(&["A", "B", "C", "D"])).for_beats(6),
    );
    let out = compile(&show, sheet, "A").expect("cm compiles");
    assert_eq!(durations(&out), vec![4, 2]);
    assert_eq!(out.context.position, at(2.0, 4.0));
    assert_eq!(out.context.remaining, 10);

    // The last dot in line heads back to the first one's spot.
    let out = compile(&show, sheet, "D").expect("cm compiles");
    assert_eq!(out.commands[0].end_position(), at(0.0, 0.0));
}

#[test]
fn counter_march_of_one_marks_time() {
    let (mut show, sheet) = show_with(16, &square());
    add(&mut show, sheet, CounterMarch::new(ids(&["A"])));
    let out = compile(&show, sheet, "A").expect("cm compiles");
    assert_eq!(texts(&out), vec!["MT 16 E"]);
    assert_eq!(out.context.position, at(0.0, 0.0));
}

#[test]
fn ordered_legs_honour_an_orientation_override() {
    let spots = [
        ("A", at(0.0, 0.0), at(0.0, 4.0)),
        ("B", at(0.0, 4.0), at(0.0, 0.0)),
    ];
    for kind in [
        ContinuityKind::from(CounterMarch::new(ids(&["A", "B"]))),
        ContinuityKind::from(FollowLeader::new(ids(&["B", "A"]), Vec::new())),
    ] {
        let (mut show, sheet) = show_with(8, &spots);
        show.add_continuity(
            sheet,
            Continuity::new(DotType::Plain, kind).with_orientation(Orientation::West),
        )
        .expect("add continuity");
        let out = compile(&show, sheet, "A").expect("ordered continuity compiles");
        assert!(matches!(out.commands[0], MovementCommand::Move(_)));
        assert_eq!(out.commands[0].end_position(), at(0.0, 4.0));
        approx(out.commands[0].orientation(), 180.0, 1e-9);

        let timeline = compile_show(&show, &Config::default());
        let state = timeline.state_at(&DotId::from("A"), 1.0).expect("beat 1");
        approx(state.angle, 180.0, 1e-9);
    }
}

#[test]
fn follow_the_leader_retraces_the_line() {
    let spots = [
        ("A", at(0.0, 0.0), at(4.0, 0.0)),
        ("B", at(0.0, -2.0), at(4.0, 0.0)),
        ("C", at(0.0, -4.0), at(4.0, 0.0)),
    ];
    let (mut show, sheet) = show_with(16, &spots);
    add(
        &mut show,
        sheet,
        FollowLeader::new(ids(&["A", "B", "C"]), vec![at(4.0, 0.0)]),
    );

    let out = compile(&show, sheet, "C").expect("ftl compiles");
    assert_eq!(durations(&out), vec![2, 2, 4, 8]);
    assert_eq!(out.commands[0].end_position(), at(0.0, -2.0));
    assert_eq!(out.commands[1].end_position(), at(0.0, 0.0));
    assert_eq!(out.context.position, at(4.0, 0.0));
    assert_eq!(out.commands[3].continuity_text(), "MT 8 E");

    let leader = compile(&show, sheet, "A").expect("ftl compiles");
    assert_eq!(durations(&leader), vec![4, 12]);
}

#[test]
fn two_step_staggers_the_start() {
    let spots = [
        ("A", at(0.0, 0.0), at(0.0, 4.0)),
        ("B", at(2.0, 0.0), at(2.0, 4.0)),
        ("C", at(4.0, 0.0), at(4.0, 4.0)),
    ];
    let (mut show, sheet) = show_with(16, &spots);
    let nested = vec![Continuity::new(
        DotType::Plain,
        ForwardMarch::new(4, CardinalDirection::East),
    )];
    add(&mut show, sheet, TwoStep::new(ids(&["A", "B", "C"]), nested));

    let out = compile(&show, sheet, "C").expect("two-step compiles");
    assert_eq!(texts(&out), vec!["MT 4 E", "Move 4 E"]);
    assert_eq!(out.context.remaining, 8);
    assert_eq!(out.context.position, at(4.0, 4.0));

    let first = compile(&show, sheet, "A").expect("two-step compiles");
    assert_eq!(texts(&first), vec!["Move 4 E"]);
}

#[test]
fn two_steps_nested_too_deep_fail() {
    let (mut show, sheet) = show_with(16, &[("A", at(0.0, 0.0), at(0.0, 0.0))]);
    let mut inner = Continuity::new(DotType::Plain, Stop::mark_time());
    for _ in 0..12 {
        inner = Continuity::new(DotType::Plain, TwoStep::new(ids(&["A"]), vec![inner]));
    }
    show.add_continuity(sheet, inner).expect("add nested");
    match compile(&show, sheet, "A") {
        Err(ContinuityError::NestingTooDeep { limit }) => assert_eq!(limit, 8),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn ordered_kinds_need_dots() {
    for kind in [
        ContinuityKind::from(CounterMarch::new(Vec::<DotId>::new())),
        ContinuityKind::from(FollowLeader::new(Vec::<DotId>::new(), Vec::new())),
        ContinuityKind::from(TwoStep::new(Vec::<DotId>::new(), Vec::new())),
    ] {
        let (mut show, sheet) = show_with(8, &[("A", at(0.0, 0.0), at(0.0, 0.0))]);
        add(&mut show, sheet, kind);
        assert!(matches!(
            compile(&show, sheet, "A"),
            Err(ContinuityError::EmptyOrder { .. })
        ));
    }
}

#[test]
fn unplaced_dot_in_an_order_is_reported_and_held() {
    let (mut show, sheet) = show_with(8, &square());
    show.add_dot("Z", "Z").expect("add Z");
    add(&mut show, sheet, CounterMarch::new(ids(&["A", "Z"])));

    match compile(&show, sheet, "A") {
        Err(ContinuityError::MissingPosition { dot, sheet: at_sheet }) => {
            assert_eq!(dot, DotId::from("Z"));
            assert_eq!(at_sheet, sheet);
        }
        other => panic!("unexpected {other:?}"),
    }

    let timeline = compile_show(&show, &Config::default());
    let a = DotId::from("A");
    let failures: Vec<_> = timeline
        .diagnostics()
        .for_dot(&a)
        .filter(|i| matches!(i.kind, IssueKind::Continuity { .. }))
        .collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(timeline.continuity_texts(&a, sheet), vec!["Close"]);
    let held = timeline.state_at(&a, 5.0).expect("A holds its spot");
    assert_eq!(held.position(), at(0.0, 0.0));
}
