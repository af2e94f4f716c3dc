use std::cell::RefCell;
use std::io::{BufRead, BufReader, Read, Write};
use std::rc::Rc;
use std::thread::{self, JoinHandle};

use calloop::EventLoop;
use calloop::channel::{Event, Sender};
use log::{debug, info, warn};

use crate::error::Result;
use crate::events::Input;
use crate::sources::desktop::DesktopCatalog;
use crate::sources::pins::MemoryPinStore;
use crate::state::LauncherList;
use crate::ui::render::JsonPrinter;

pub type DockList = LauncherList<DesktopCatalog, MemoryPinStore>;

/// The launcher list plus the printer watching it, driven by the input feed.
pub struct Dock<W: Write> {
    list: DockList,
    printer: Rc<RefCell<JsonPrinter<W>>>,
    should_exit: bool,
}

impl<W: Write + 'static> Dock<W> {
    pub fn new(mut list: DockList, printer: JsonPrinter<W>) -> Self {
        let printer = Rc::new(RefCell::new(printer));
        list.subscribe(printer.clone());
        Self {
            list,
            printer,
            should_exit: false,
        }
    }

    pub fn list(&self) -> &DockList {
        &self.list
    }

    pub fn dump(&self) {
        self.printer.borrow_mut().dump(self.list.iter());
    }

    pub fn handle(&mut self, input: Input) {
        match input {
            Input::Pin { app_id } => {
                self.list.pin(&app_id);
            }
            Input::Unpin { app_id } => {
                self.list.unpin(&app_id);
            }
            Input::Dump => self.dump(),
            lifecycle => {
                if let Ok(event) = lifecycle.into_event() {
                    debug!("Dock: {event:?}");
                    event.dispatch(&mut self.list);
                }
            }
        }
    }

    /// Handles every line of `source` in order and returns once it is exhausted.
    pub fn run<R: Read + Send + 'static>(&mut self, source: R) -> Result<()> {
        let mut event_loop: EventLoop<Self> = EventLoop::try_new()?;
        let (tx, rx) = calloop::channel::channel::<Input>();
        event_loop
            .handle()
            .insert_source(rx, |event, _, dock: &mut Self| match event {
                Event::Msg(input) => dock.handle(input),
                Event::Closed => dock.should_exit = true,
            })
            .map_err(|err| err.error)?;
        spawn_reader(source, tx);

        while !self.should_exit {
            event_loop.dispatch(None, self)?;
        }

        let pinned: Vec<_> = self.list.pinned_ids().collect();
        info!(
            "Dock: event feed closed with {} launchers, pinned {:?}",
            self.list.len(),
            pinned
        );
        Ok(())
    }
}

/// Decodes `source` line by line on its own thread. Lines that are not UTF-8
/// or not valid input are logged and skipped; only a read error ends the feed.
pub fn spawn_reader<R: Read + Send + 'static>(source: R, tx: Sender<Input>) -> JoinHandle<()> {
    thread::spawn(move || {
        for (n, line) in BufReader::new(source).split(b'\n').enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    warn!("event feed read error: {err}");
                    break;
                }
            };
            let line = match String::from_utf8(line) {
                Ok(line) => line,
                Err(err) => {
                    warn!("skipping line {}: {err}", n + 1);
                    continue;
                }
            };
            match Input::parse(&line) {
                Ok(Some(input)) => {
                    if tx.send(input).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(err) => warn!("skipping line {}: {err}", n + 1),
            }
        }
    })
}
