//! Background asset loading
//!
//! File IO and decoding run on a worker thread; GPU upload happens on the
//! main thread when [`ModelLoader::update`] polls for finished work.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use crate::renderer::Renderer;

use super::model::{Model, ModelData, ModelError};

/// A value being produced on a background thread
pub struct LoadTask<T> {
    receiver: mpsc::Receiver<T>,
}

impl<T: Send + 'static> LoadTask<T> {
    /// Run `f` on a new thread and return a handle to poll for its result
    pub fn spawn<F>(f: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            // The receiver may have been dropped; nothing to do then.
            let _ = sender.send(f());
        });
        Self { receiver }
    }

    /// Take the result if the worker has finished
    pub fn poll(&mut self) -> Option<T> {
        self.receiver.try_recv().ok()
    }
}

/// Loads glTF models on background threads and uploads them as they finish
#[derive(Default)]
pub struct ModelLoader {
    tasks: Vec<LoadTask<(PathBuf, Result<ModelData, ModelError>)>>,
}

impl ModelLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading a model file in the background
    pub fn load_async(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        log::debug!("Loading model: {}", path.display());
        self.tasks.push(LoadTask::spawn(move || {
            let result = ModelData::load(&path);
            (path, result)
        }));
    }

    /// Poll pending loads and upload any that finished.
    ///
    /// Failed loads are logged and dropped.
    pub fn update(&mut self, renderer: &Renderer) -> Vec<Model> {
        let mut finished = Vec::new();

        self.tasks.retain_mut(|task| match task.poll() {
            Some((_, Ok(data))) => {
                finished.push(Model::upload(data, renderer));
                false
            }
            Some((path, Err(e))) => {
                log::error!("Failed to load {}: {e}", path.display());
                false
            }
            None => true,
        });

        finished
    }

    /// Number of loads still in flight
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_load_task_delivers_result() {
        let mut task = LoadTask::spawn(|| 7 * 6);

        let mut result = None;
        for _ in 0..100 {
            result = task.poll();
            if result.is_some() {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(result, Some(42));
        // Once taken, the result is gone.
        assert_eq!(task.poll(), None);
    }

    #[test]
    fn test_missing_file_reports_error() {
        let result = ModelData::load("does/not/exist.gltf");
        assert!(matches!(result, Err(ModelError::Gltf(_))));
    }
}
