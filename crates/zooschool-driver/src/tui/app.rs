/*
[INPUT]:  TripPlan, messenger, completion recorder, key-driven actions
[OUTPUT]: DriveApp state for rendering and the drive-session flow
[POS]:    TUI app state
[UPDATE]: 2026-10-16 Replace task dashboard state with trip execution state
*/

use chrono::{DateTime, Local};
use tui_input::{Input, InputRequest};
use zooschool_adapter::maps;

use zooschool_driver::messaging::{
    DeliveryReport, MessageTemplate, Messenger, OutgoingMessage, TemplateContext, render,
};
use zooschool_driver::sequencer::{Progress, TripExecution, TripStep};
use zooschool_driver::{CompletionRecorder, TripCompletion, TripPlan};

use super::LogBufferHandle;

pub(super) enum Mode {
    Trip,
    Compose(ComposeState),
    Complete(CompletionForm),
    /// Completion recorded; the loop exits
    Done,
}

pub(super) struct ComposeState {
    pub(super) template: MessageTemplate,
    pub(super) input: Input,
    pub(super) contact_name: String,
    pub(super) contact_phone: String,
    context: TemplateContext,
}

impl ComposeState {
    fn select(&mut self, template: MessageTemplate) {
        self.template = template;
        self.input = Input::new(render(template, &self.context));
    }
}

#[derive(Default)]
pub(super) struct CompletionForm {
    pub(super) rating: Option<u8>,
    pub(super) notes: Input,
}

impl CompletionForm {
    pub(super) fn rating_up(&mut self) {
        self.rating = Some(self.rating.map_or(1, |r| (r + 1).min(5)));
    }

    pub(super) fn rating_down(&mut self) {
        self.rating = match self.rating {
            Some(r) if r > 1 => Some(r - 1),
            _ => None,
        };
    }
}

pub struct DriveApp {
    pub(super) plan: TripPlan,
    pub(super) execution: TripExecution,
    pub(super) mode: Mode,
    pub(super) status_message: String,
    pub(super) log_buffer: Option<LogBufferHandle>,
    pub(super) now: DateTime<Local>,
    messenger: Messenger,
    recorder: CompletionRecorder,
    completion: Option<TripCompletion>,
}

impl DriveApp {
    pub fn new(plan: TripPlan, messenger: Messenger, recorder: CompletionRecorder) -> Self {
        let execution = TripExecution::from_plan(&plan);
        Self {
            plan,
            execution,
            mode: Mode::Trip,
            status_message: "Ready. Press Enter to start the trip".to_string(),
            log_buffer: None,
            now: Local::now(),
            messenger,
            recorder,
            completion: None,
        }
    }

    pub fn with_log_buffer(mut self, buffer: LogBufferHandle) -> Self {
        self.log_buffer = Some(buffer);
        self
    }

    pub fn plan(&self) -> &TripPlan {
        &self.plan
    }

    pub fn execution(&self) -> &TripExecution {
        &self.execution
    }

    /// Recorded completion, once the driver finished the trip
    pub fn completion(&self) -> Option<&TripCompletion> {
        self.completion.as_ref()
    }

    pub(super) fn is_done(&self) -> bool {
        matches!(self.mode, Mode::Done)
    }

    pub(super) fn on_tick(&mut self) {
        self.execution.tick();
        self.now = Local::now();
    }

    pub(super) fn on_delivery(&mut self, report: DeliveryReport) {
        self.status_message = match report.error {
            None => format!("Message delivered to {}", report.to),
            Some(err) => format!("Message to {} failed: {err}", report.to),
        };
    }

    /// Start the trip, or confirm the current step
    pub(super) fn confirm_step(&mut self) {
        if !self.execution.is_started() {
            match self.execution.start() {
                Ok(_) => {
                    tracing::info!(trip_id = %self.plan.trip_id, "trip started");
                    self.status_message = "Trip started".to_string();
                }
                Err(err) => self.status_message = err.to_string(),
            }
            return;
        }

        match self.execution.advance() {
            Ok(Progress::Moved(index)) => {
                tracing::info!(trip_id = %self.plan.trip_id, step = index, "step confirmed");
                self.status_message = match self.execution.current_step() {
                    TripStep::Pickup { rider, .. } => format!("Next pickup: {}", rider.name),
                    _ => "All riders on board. Head to the destination".to_string(),
                };
            }
            Ok(Progress::Finished) => {
                tracing::info!(
                    trip_id = %self.plan.trip_id,
                    elapsed_seconds = self.execution.elapsed_seconds(),
                    "arrived at destination"
                );
                self.mode = Mode::Complete(CompletionForm::default());
                self.status_message = "Trip complete. Rate it and add notes".to_string();
            }
            Err(err) => self.status_message = err.to_string(),
        }
    }

    pub(super) fn open_compose(&mut self) {
        let TripStep::Pickup {
            rider, eta_minutes, ..
        } = self.execution.current_step()
        else {
            self.status_message = "No rider contact at this step".to_string();
            return;
        };

        let context = TemplateContext {
            child_name: rider.name.clone(),
            eta: eta_minutes.to_string(),
            vehicle_color: self.plan.vehicle.color.clone(),
            vehicle_model: self.plan.vehicle.model.clone(),
        };
        let mut compose = ComposeState {
            template: MessageTemplate::OnWay,
            input: Input::default(),
            contact_name: rider.contact_name.clone(),
            contact_phone: rider.contact_phone.clone(),
            context,
        };
        compose.select(MessageTemplate::OnWay);
        self.mode = Mode::Compose(compose);
    }

    pub(super) fn cycle_template(&mut self, forward: bool) {
        if let Mode::Compose(compose) = &mut self.mode {
            let next = if forward {
                compose.template.next()
            } else {
                compose.template.previous()
            };
            compose.select(next);
        }
    }

    pub(super) fn send_message(&mut self) {
        let Mode::Compose(compose) = &self.mode else {
            return;
        };
        let message = OutgoingMessage {
            to: compose.contact_phone.clone(),
            body: compose.input.value().to_string(),
            trip_id: self.plan.trip_id.clone(),
        };
        let contact = compose.contact_name.clone();

        match self.messenger.dispatch(message) {
            Ok(()) => {
                self.status_message = format!("Sending message to {contact}");
                self.mode = Mode::Trip;
            }
            Err(err) => self.status_message = format!("Cannot send: {err}"),
        }
    }

    pub(super) fn edit_input(&mut self, request: InputRequest) {
        match &mut self.mode {
            Mode::Compose(compose) => {
                compose.input.handle(request);
            }
            Mode::Complete(form) => {
                form.notes.handle(request);
            }
            _ => {}
        }
    }

    pub(super) fn close_compose(&mut self) {
        if matches!(self.mode, Mode::Compose(_)) {
            self.mode = Mode::Trip;
        }
    }

    pub(super) fn adjust_rating(&mut self, up: bool) {
        if let Mode::Complete(form) = &mut self.mode {
            if up {
                form.rating_up();
            } else {
                form.rating_down();
            }
        }
    }

    /// Record the completion; `skip` drops rating and notes
    pub(super) async fn submit_completion(&mut self, skip: bool) {
        let Mode::Complete(form) = &self.mode else {
            return;
        };
        let (rating, notes) = if skip {
            (None, None)
        } else {
            (form.rating, Some(form.notes.value().to_string()))
        };

        let completion = match TripCompletion::new(
            self.plan.trip_id.clone(),
            self.execution.elapsed_seconds(),
            rating,
            notes,
        ) {
            Ok(completion) => completion,
            Err(err) => {
                self.status_message = format!("Invalid completion: {err}");
                return;
            }
        };

        match self.recorder.record(completion.clone()).await {
            Ok(warning) => {
                self.status_message =
                    warning.unwrap_or_else(|| "Trip completion saved".to_string());
                self.completion = Some(completion);
                self.mode = Mode::Done;
            }
            Err(err) => self.status_message = format!("Failed to save completion: {err}"),
        }
    }

    /// Maps link for the current step
    pub(super) fn show_navigation(&mut self) {
        let link = match self.execution.current_step() {
            TripStep::Start => {
                self.status_message = "Start the trip first".to_string();
                return;
            }
            TripStep::Pickup { rider, .. } => match rider.location() {
                Some(point) => maps::directions_url(point.lat, point.lng),
                None => maps::search_url(&rider.address),
            },
            TripStep::Destination { address, .. } => maps::search_url(address),
        };
        self.status_message = match link {
            Ok(url) => format!("Navigate: {url}"),
            Err(err) => format!("No navigation link: {err}"),
        };
    }

    pub(super) fn show_call_link(&mut self) {
        let Some(rider) = self.execution.current_step().rider() else {
            self.status_message = "No rider contact at this step".to_string();
            return;
        };
        self.status_message = match maps::tel_url(&rider.contact_phone) {
            Some(tel) => format!("Call {}: {tel}", rider.contact_name),
            None => format!("No phone number for {}", rider.contact_name),
        };
    }
}
