use std::time::Duration;

use keygrid_render::{
    flowing_noise, index, scrolling_text, solid_color, two_color_noise, FlowOptions, GlyphMap,
    Pacer, RecordingSink, Repeat, Rgb, Scheduler, ScrollOptions, SpeckleOptions, Timing, COLS,
    PIXEL_COUNT, SCROLL_MARGIN,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Default)]
struct NoPause {
    total: Duration,
}

impl Pacer for NoPause {
    fn pause(&mut self, delay: Duration) {
        self.total += delay;
    }
}

fn scheduler(seed: u64) -> Scheduler<RecordingSink, NoPause, StdRng> {
    Scheduler::new(RecordingSink::new())
        .with_pacer(NoPause::default())
        .with_rng(StdRng::seed_from_u64(seed))
}

#[test]
fn solid_red_is_a_single_exact_write() {
    let mut sink = RecordingSink::new();
    let frame = solid_color(&mut sink, Rgb::new(255, 0, 0)).unwrap();

    assert!(frame.pixels().iter().all(|&pixel| pixel == Rgb::new(255, 0, 0)));
    assert_eq!(sink.frames(), &[[255u8, 0, 0].repeat(PIXEL_COUNT)]);
}

#[test]
fn single_pixel_text_scrolls_across_the_grid() {
    let mut font = GlyphMap::default();
    font.insert('A', vec![(0, 0)]);
    let options = ScrollOptions { twinkle: false, ..Default::default() };
    let mut effect = scrolling_text("A", &font, options).unwrap();
    assert_eq!(effect.layout().scroll_width(), 1 + COLS + SCROLL_MARGIN as usize);

    let mut scheduler = scheduler(0);
    let report = scheduler.run(&mut effect).unwrap();
    assert_eq!(report.frames_written as usize, 1 + COLS + SCROLL_MARGIN as usize);

    // Tick 15 projects x = 0 onto column 0.
    let frame = &scheduler.sink().frames()[15];
    let at = index(0, 0) * 3;
    assert_eq!(&frame[at..at + 3], &[255, 0, 0]);
    let next = index(0, 1) * 3;
    assert_eq!(&frame[next..next + 3], &[0, 255, 0]);
}

#[test]
fn flowing_noise_replays_with_a_fixed_origin() {
    let options = FlowOptions { timing: Timing::new(1, 5).unwrap(), origin: Some(200) };

    let mut first = scheduler(1);
    first.run(&mut flowing_noise(options).unwrap()).unwrap();
    let mut second = scheduler(2);
    second.run(&mut flowing_noise(options).unwrap()).unwrap();

    assert_eq!(first.sink().frames(), second.sink().frames());
    assert_eq!(first.pacer().total, Duration::from_secs(1));
}

#[test]
fn speckle_burst_honours_its_timing() {
    let repeat = Repeat::Burst(Timing::new(2, 10).unwrap());
    let options = SpeckleOptions { variety: 64, repeat };
    let mut effect = two_color_noise(Rgb::RED, Rgb::new(0, 0, 255), options).unwrap();

    let mut scheduler = scheduler(3);
    let report = scheduler.run(&mut effect).unwrap();
    assert_eq!(report.frames_written, 20);
    assert_eq!(scheduler.pacer().total, Duration::from_secs(2));
}

#[test]
fn brightness_goes_through_the_control_channel() {
    let mut scheduler = scheduler(0);
    keygrid_render::DeviceSink::set_brightness(scheduler.sink_mut(), 32).unwrap();
    assert_eq!(scheduler.sink().controls(), &[("brightness".to_owned(), "32".to_owned())]);
    assert!(scheduler.sink().frames().is_empty());
}
