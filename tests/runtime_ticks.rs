use crumbtrail_widgets::animator::{self, with_interval, State};
use crumbtrail_widgets::bar::{self, with_percent};
use crumbtrail_widgets::breadcrumb::{self, Step};
use crumbtrail_widgets::buttons;
use crumbtrail_widgets::page::Model as Page;
use crumbtrail_widgets::select::{self, SelectOption};
use std::time::Duration;

fn page() -> Page {
    Page::new(
        breadcrumb::Model::new(vec![Step::new("one", "One")]),
        select::Model::new(vec![SelectOption::new("Only bar", "x")]),
        buttons::Model::default(),
        animator::new(
            vec![bar::new("x", &[with_percent(10)])],
            &[with_interval(Duration::from_millis(1))],
        ),
    )
}

#[tokio::test]
async fn tick_commands_drive_a_run_to_completion() {
    let mut page = page();
    let mut next = Some(page.adjust(5).expect("run starts"));
    let mut deliveries = 0;

    while let Some(cmd) = next.take() {
        let msg = cmd.await.expect("tick produces a message");
        next = page.update(msg);
        deliveries += 1;
        assert!(deliveries <= 10);
    }

    // Five moves and the stopping tick.
    assert_eq!(deliveries, 6);
    assert_eq!(page.animator.state(), State::Idle);
    assert_eq!(page.animator.bar("x").unwrap().label(), "15%");
    assert!(!page.buttons.all_disabled());
}
