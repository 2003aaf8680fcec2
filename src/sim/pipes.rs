//! Pipe stream: the scrolling sequence of gapped obstacles
//!
//! The stream is a fixed-length FIFO. Pipes enter on the right, scroll left at
//! a constant speed, and once the oldest one is fully off-screen it is dropped
//! from the front and a fresh pipe is appended one spacing behind the tail.

use std::collections::VecDeque;

use rand::Rng;

use super::collision::Aabb;

/// Geometry and motion parameters shared by every pipe in a stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipeLayout {
    pub window_width: f32,
    pub window_height: f32,
    /// Horizontal extent of a pipe
    pub width: f32,
    /// Vertical opening between the top and bottom halves
    pub gap: f32,
    /// Minimum distance between the gap and the top/bottom edges
    pub margin: f32,
    /// Horizontal distance between consecutive pipes at spawn time
    pub spacing: f32,
    /// Leftward movement per tick
    pub speed: f32,
    /// Number of pipes in the stream
    pub count: usize,
}

impl PipeLayout {
    /// Inclusive range of top heights a spawned pipe can draw
    ///
    /// Heights are whole world units. A degenerate layout collapses to the
    /// lower bound instead of producing an empty range.
    pub fn top_height_range(&self) -> (i32, i32) {
        let (lo, hi) = self.whole_height_bounds();
        (lo, hi.max(lo))
    }

    /// Whether at least one whole top height keeps both margins
    pub fn fits_whole_height(&self) -> bool {
        let (lo, hi) = self.whole_height_bounds();
        lo <= hi
    }

    fn whole_height_bounds(&self) -> (i32, i32) {
        let lo = self.margin.ceil() as i32;
        let hi = (self.window_height - self.gap - self.margin).floor() as i32;
        (lo, hi)
    }

    /// Spawn position of the `index`-th pipe of a fresh stream
    pub fn start_x(&self, index: usize) -> f32 {
        self.window_width + index as f32 * self.spacing
    }
}

/// A pipe pair sharing one horizontal position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipe {
    /// Leading (left) edge
    pub x: f32,
    pub top_height: f32,
    pub bottom_height: f32,
    /// Set once the bird has passed this pipe
    pub scored: bool,
}

impl Pipe {
    pub fn top_rect(&self, layout: &PipeLayout) -> Aabb {
        Aabb::from_xywh(self.x, 0.0, layout.width, self.top_height)
    }

    pub fn bottom_rect(&self, layout: &PipeLayout) -> Aabb {
        Aabb::from_xywh(
            self.x,
            self.top_height + layout.gap,
            layout.width,
            self.bottom_height,
        )
    }

    /// Right edge of the pipe
    #[inline]
    pub fn trailing_edge(&self, layout: &PipeLayout) -> f32 {
        self.x + layout.width
    }
}

/// Ordered, fixed-length stream of pipes (oldest at the front)
#[derive(Debug, Clone)]
pub struct PipeStream {
    layout: PipeLayout,
    pipes: VecDeque<Pipe>,
}

impl PipeStream {
    /// Create a stream populated with `layout.count` pipes just past the right edge
    pub fn new<R: Rng + ?Sized>(layout: PipeLayout, rng: &mut R) -> Self {
        let mut stream = Self {
            layout,
            pipes: VecDeque::with_capacity(layout.count),
        };
        stream.reset(rng);
        stream
    }

    /// Replace every pipe with a freshly spawned one at the initial spacing
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.pipes.clear();
        for i in 0..self.layout.count {
            let pipe = self.spawn(self.layout.start_x(i), rng);
            self.pipes.push_back(pipe);
        }
    }

    /// Build a pipe at `x` with a randomly placed gap
    pub fn spawn<R: Rng + ?Sized>(&self, x: f32, rng: &mut R) -> Pipe {
        let (lo, hi) = self.layout.top_height_range();
        let top_height = rng.random_range(lo..=hi) as f32;
        Pipe {
            x,
            top_height,
            bottom_height: self.layout.window_height - top_height - self.layout.gap,
            scored: false,
        }
    }

    /// Scroll every pipe left by one tick's worth of movement
    pub fn advance(&mut self) {
        let speed = self.layout.speed;
        for pipe in &mut self.pipes {
            pipe.x -= speed;
        }
    }

    /// Drop the front pipe if it is fully off-screen and append a new one
    ///
    /// Returns the x of the appended pipe. At most one pipe is recycled per call.
    pub fn recycle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<f32> {
        let front = self.pipes.front()?;
        if front.x >= -self.layout.width {
            return None;
        }
        let tail_x = self.pipes.back()?.x;
        self.pipes.pop_front();

        let x = tail_x + self.layout.spacing;
        let pipe = self.spawn(x, rng);
        self.pipes.push_back(pipe);
        Some(x)
    }

    /// Index of the first pipe whose top or bottom half overlaps `bounds`
    pub fn first_collision(&self, bounds: &Aabb) -> Option<usize> {
        self.pipes.iter().position(|pipe| {
            bounds.intersects(&pipe.top_rect(&self.layout))
                || bounds.intersects(&pipe.bottom_rect(&self.layout))
        })
    }

    /// Mark every unscored pipe whose trailing edge is left of `line`
    ///
    /// Returns how many pipes were newly marked.
    pub fn award(&mut self, line: f32) -> u32 {
        let layout = self.layout;
        let mut awarded = 0;
        for pipe in self.pipes.iter_mut().filter(|p| !p.scored) {
            if pipe.trailing_edge(&layout) < line {
                pipe.scored = true;
                awarded += 1;
            }
        }
        awarded
    }

    pub fn layout(&self) -> &PipeLayout {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pipe> {
        self.pipes.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Pipe> {
        self.pipes.get(index)
    }

    pub fn front(&self) -> Option<&Pipe> {
        self.pipes.front()
    }

    pub fn back(&self) -> Option<&Pipe> {
        self.pipes.back()
    }

    #[cfg(test)]
    pub(crate) fn pipes_mut(&mut self) -> &mut VecDeque<Pipe> {
        &mut self.pipes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruleset::Ruleset;
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    fn layout() -> PipeLayout {
        Ruleset::scored().pipe_layout()
    }

    fn ticks_until_recycle(stream: &mut PipeStream, rng: &mut Pcg32) -> (f32, f32) {
        for _ in 0..10_000 {
            let tail_x = stream.back().unwrap().x;
            stream.advance();
            let tail_after_advance = tail_x - stream.layout().speed;
            if let Some(x) = stream.recycle(rng) {
                return (tail_after_advance, x);
            }
        }
        panic!("stream never recycled");
    }

    #[test]
    fn test_top_height_range_for_default_window() {
        assert_eq!(layout().top_height_range(), (50, 400));
        assert!(layout().fits_whole_height());
    }

    #[test]
    fn test_fractional_margins_can_leave_no_whole_height() {
        let layout = PipeLayout {
            gap: 599.8,
            margin: 0.1,
            ..layout()
        };
        assert!(!layout.fits_whole_height());

        let exact = PipeLayout {
            gap: 500.0,
            margin: 50.0,
            ..self::layout()
        };
        assert!(exact.fits_whole_height());
        assert_eq!(exact.top_height_range(), (50, 50));
    }

    #[test]
    fn test_spawn_respects_margins() {
        let mut rng = Pcg32::seed_from_u64(7);
        let stream = PipeStream::new(layout(), &mut rng);
        for _ in 0..2_000 {
            let pipe = stream.spawn(0.0, &mut rng);
            assert!((50.0..=400.0).contains(&pipe.top_height));
            assert_eq!(pipe.bottom_height, 600.0 - pipe.top_height - 150.0);
            assert!(!pipe.scored);
        }
    }

    #[test]
    fn test_spawn_is_reproducible_from_seed() {
        let layout = layout();
        let mut rng = Pcg32::seed_from_u64(1234);
        let stream = PipeStream::new(layout, &mut rng);

        let mut expected = Pcg32::seed_from_u64(1234);
        for pipe in stream.iter() {
            let top = expected.random_range(50..=400) as f32;
            assert_eq!(pipe.top_height, top);
        }
    }

    #[test]
    fn test_new_stream_initial_spacing() {
        let mut rng = Pcg32::seed_from_u64(1);
        let stream = PipeStream::new(layout(), &mut rng);
        let xs: Vec<f32> = stream.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![800.0, 1100.0, 1400.0]);
    }

    #[test]
    fn test_advance_moves_every_pipe() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut stream = PipeStream::new(layout(), &mut rng);
        stream.advance();
        let xs: Vec<f32> = stream.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![800.0 - 1.8, 1100.0 - 1.8, 1400.0 - 1.8]);
    }

    #[test]
    fn test_no_recycle_while_front_visible() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut stream = PipeStream::new(layout(), &mut rng);
        stream.pipes_mut()[0].x = -70.0;
        assert_eq!(stream.recycle(&mut rng), None);
        assert_eq!(stream.front().unwrap().x, -70.0);
    }

    #[test]
    fn test_recycle_appends_behind_tail() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut stream = PipeStream::new(layout(), &mut rng);
        let second = *stream.get(1).unwrap();

        let (old_tail, new_x) = ticks_until_recycle(&mut stream, &mut rng);

        assert_eq!(stream.len(), 3);
        assert_eq!(new_x, old_tail + 300.0);
        assert_eq!(stream.back().unwrap().x, new_x);
        // The old second pipe is now at the front
        assert_eq!(stream.front().unwrap().top_height, second.top_height);
    }

    #[test]
    fn test_single_pipe_stream_recycles_onto_itself() {
        let mut layout = layout();
        layout.count = 1;
        let mut rng = Pcg32::seed_from_u64(9);
        let mut stream = PipeStream::new(layout, &mut rng);
        stream.pipes_mut()[0].x = -71.0;

        assert_eq!(stream.recycle(&mut rng), Some(229.0));
        assert_eq!(stream.len(), 1);
    }

    #[test]
    fn test_first_collision_reports_first_match() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut stream = PipeStream::new(layout(), &mut rng);
        {
            let pipes = stream.pipes_mut();
            pipes[0].x = 90.0;
            pipes[0].top_height = 100.0;
            pipes[0].bottom_height = 350.0;
            pipes[1].x = 95.0;
            pipes[1].top_height = 100.0;
            pipes[1].bottom_height = 350.0;
        }

        let in_gap = Aabb::from_xywh(100.0, 150.0, 34.0, 24.0);
        assert_eq!(stream.first_collision(&in_gap), None);

        let hits_top = Aabb::from_xywh(100.0, 80.0, 34.0, 24.0);
        assert_eq!(stream.first_collision(&hits_top), Some(0));

        let hits_bottom = Aabb::from_xywh(100.0, 240.0, 34.0, 24.0);
        assert_eq!(stream.first_collision(&hits_bottom), Some(0));
    }

    #[test]
    fn test_award_scores_each_pipe_once() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut stream = PipeStream::new(layout(), &mut rng);
        stream.pipes_mut()[0].x = 19.0; // trailing edge 89 < 90

        assert_eq!(stream.award(90.0), 1);
        assert!(stream.front().unwrap().scored);
        assert_eq!(stream.award(90.0), 0);
    }

    #[test]
    fn test_award_requires_strictly_passed() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut stream = PipeStream::new(layout(), &mut rng);
        stream.pipes_mut()[0].x = 20.0; // trailing edge exactly on the line
        assert_eq!(stream.award(90.0), 0);
    }

    proptest! {
        #[test]
        fn prop_stream_invariants_hold(seed in any::<u64>(), ticks in 0usize..3_000) {
            let layout = layout();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut stream = PipeStream::new(layout, &mut rng);

            for _ in 0..ticks {
                stream.advance();
                let tail_x = stream.back().unwrap().x;
                if let Some(x) = stream.recycle(&mut rng) {
                    prop_assert_eq!(x, tail_x + layout.spacing);
                    prop_assert_eq!(stream.back().unwrap().x, x);
                }
            }

            prop_assert_eq!(stream.len(), layout.count);
            for pipe in stream.iter() {
                prop_assert_eq!(
                    pipe.top_height + layout.gap + pipe.bottom_height,
                    layout.window_height
                );
            }
            let xs: Vec<f32> = stream.iter().map(|p| p.x).collect();
            for pair in xs.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }
        }
    }
}
