use std::thread;
use std::sync::mpsc;
use std::sync::{ Arc, Mutex, MutexGuard };

use anyhow::{ anyhow, Result };
use log::{ debug, info };

use crate::world::World;
use crate::camera::{ Camera, RenderOutput };

pub enum Message {
    Row(usize),
    Terminate,
}

struct Worker {
    thread: Option<thread::JoinHandle<()>>,
}

// Poisoning is ignored: rows are written whole under a single lock.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Worker {
    fn new(id: usize, world: Arc<World>, camera: Arc<Camera>,
        output: Arc<Mutex<RenderOutput>>,
        receiver: Arc<Mutex<mpsc::Receiver<Message>>>) -> Worker {

        let thread = thread::spawn(move || loop {
            // Obtain the message being executed.
            let message = lock(&receiver).recv();

            match message {
                Ok(Message::Row(y)) => {
                    // Shade the row without holding the output lock.
                    let row = camera.render_row(&world, y);

                    let mut guard = lock(&output);
                    for (x, (color, mask)) in row.iter().enumerate() {
                        guard.image.write_pixel(x, y, color);
                        guard.mask.write_pixel(x, y, mask);
                    }
                    drop(guard);

                    if y % camera.progress_interval() == 0 {
                        info!("Progress: {}%", y * 100 / camera.vsize);
                    }
                },

                // Exit the worker thread loop, terminating the thread. A
                // closed channel means the pool is gone.
                Ok(Message::Terminate) | Err(_) => {
                    debug!("Worker {} exiting.", id);
                    break;
                }
            }
        });

        Worker { thread: Some(thread) }
    }
}

/// A fixed-size pool of render threads sharing one world and camera.
///
/// Rows are handed out over a channel, so each pixel is written by exactly
/// one worker. Dropping the pool waits for all queued rows to finish.
pub struct ThreadPool {
    workers: Vec<Worker>,
    sender: mpsc::Sender<Message>,
}

impl ThreadPool {
    pub fn new(size: usize, world: Arc<World>, camera: Arc<Camera>,
        output: Arc<Mutex<RenderOutput>>) -> ThreadPool {
        // There should be at least one thread to run workers.
        assert!(size > 0);

        let (sender, receiver) = mpsc::channel();
        let receiver = Arc::new(Mutex::new(receiver));

        let mut workers = Vec::with_capacity(size);

        for id in 0..size {
            workers.push(Worker::new(
                id,
                Arc::clone(&world),
                Arc::clone(&camera),
                Arc::clone(&output),
                Arc::clone(&receiver)
            ));
        }

        ThreadPool { workers, sender }
    }

    pub fn execute(&mut self, message: Message) -> Result<()> {
        self.sender.send(message)
            .map_err(|_| anyhow!("Render workers have all exited."))
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        for _ in &self.workers {
            // Workers that already exited need no message.
            let _ = self.sender.send(Message::Terminate);
        }

        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                if thread.join().is_err() {
                    debug!("A render worker panicked.");
                }
            }
        }
    }
}

/// Renders with `threads` workers. The result is pixel-for-pixel identical
/// to `Camera::render`, since every pixel depends only on the read-only
/// world and camera.
pub fn parallel_render(world: &World, camera: &Camera, threads: usize)
    -> Result<RenderOutput> {
    let vsize = camera.vsize;
    let hsize = camera.hsize;
    let output = Arc::new(Mutex::new(RenderOutput::new(hsize, vsize)));

    info!("Rendering using {} threads...", threads);
    {
        let mut thread_pool = ThreadPool::new(
            threads,
            Arc::new(world.clone()),
            Arc::new(camera.clone()),
            Arc::clone(&output)
        );

        for y in 0..vsize {
            thread_pool.execute(Message::Row(y))?;
        }
    }

    let output = Arc::try_unwrap(output)
        .map_err(|_| anyhow!("Render output is still shared after the pool finished."))?;

    Ok(output.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner()))
}

#[test]
fn parallel_render_matches_serial() {
    let scene = crate::camera::fixed_scene();

    let serial = scene.camera.render(&scene.world);
    let parallel = parallel_render(&scene.world, &scene.camera, 4).unwrap();

    assert!(serial == parallel);
}

#[test]
fn parallel_render_small_image_many_threads() {
    let mut json = crate::scene::SceneJson::fixed();
    json.canvas_width = 16;
    json.canvas_height = 3;

    let scene = {
        use std::convert::TryFrom;
        crate::scene::Scene::try_from(json).unwrap()
    };

    let serial = scene.camera.render(&scene.world);
    let parallel = parallel_render(&scene.world, &scene.camera, 8).unwrap();

    assert!(serial == parallel);
}
