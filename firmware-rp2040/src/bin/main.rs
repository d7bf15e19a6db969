#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::{error, info};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Blocking, Channel as AdcChannel, Config as AdcConfig};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Instant, Ticker};
use embassy_usb::class::cdc_acm::{CdcAcmClass, State};
use embassy_usb::{Builder, Config as UsbConfig};
use eos_bridge_rp2040::board::Pin;
use eos_bridge_rp2040::{
    configure_usb_serial, forward_frames, AdcInput, FrameChannel, FrameQueue, SerialGateway,
    Surface, SurfacePins,
};
use eos_core::{commands, Control, Gateway, SerialLink, ShiftButton};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

/// Control poll period.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Polls between two LED toggles.
const HEARTBEAT_POLLS: u32 = 500;

/// Encoded frames on their way to the USB task.
static FRAMES: StaticCell<FrameChannel> = StaticCell::new();

/// Shift modifier shared by every encoder and wheel.
static SHIFT: StaticCell<ShiftButton<Pin>> = StaticCell::new();

/// ADC shared by the fader wipers.
static ADC: StaticCell<RefCell<Adc<'static, Blocking>>> = StaticCell::new();

/// USB device configuration buffer.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// CDC-ACM state.
static CDC_STATE: StaticCell<State> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Eos bridge starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    let frames: &'static FrameChannel = FRAMES.init(Channel::new());

    // --- Controls ---
    let shift: &'static ShiftButton<Pin> = SHIFT.init(ShiftButton::new(Input::new(p.PIN_2, Pull::Up)));
    let adc: &'static RefCell<Adc<'static, Blocking>> =
        ADC.init(RefCell::new(Adc::new_blocking(p.ADC, AdcConfig::default())));

    let pins = SurfacePins {
        pan_a: Input::new(p.PIN_3, Pull::Up),
        pan_b: Input::new(p.PIN_4, Pull::Up),
        pan_button: Input::new(p.PIN_5, Pull::Up),
        tilt_a: Input::new(p.PIN_6, Pull::Up),
        tilt_b: Input::new(p.PIN_7, Pull::Up),
        wheel_a: Input::new(p.PIN_8, Pull::Up),
        wheel_b: Input::new(p.PIN_9, Pull::Up),
        wheel_fine: Input::new(p.PIN_10, Pull::Up),
        go: Input::new(p.PIN_14, Pull::Up),
        stop: Input::new(p.PIN_15, Pull::Up),
        macro_1: Input::new(p.PIN_16, Pull::Up),
        highlight: Input::new(p.PIN_17, Pull::Up),
        fader_fire: Input::new(p.PIN_18, Pull::Up),
        fader_stop: Input::new(p.PIN_19, Pull::Up),
        sub_fire: Input::new(p.PIN_20, Pull::Up),
        fader_wiper: AdcChannel::new_pin(p.PIN_26, Pull::None),
        sub_wiper: AdcChannel::new_pin(p.PIN_27, Pull::None),
    };

    let surface = match Surface::new(
        pins,
        shift,
        |channel| AdcInput::new(adc, channel),
        Instant::now().as_millis(),
    ) {
        Ok(surface) => surface,
        Err(e) => {
            error!("Control surface setup failed: {:?}", e);
            return;
        }
    };

    let gateway = Gateway::new(SerialLink::new(FrameQueue::new(frames)));

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(0x1209, 0x0001); // pid.codes test VID/PID
    usb_config.manufacturer = Some("Eos Bridge");
    usb_config.product = Some("Eos Control Surface");
    usb_config.serial_number = Some("001");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let config_descriptor = CONFIG_DESCRIPTOR.init([0; 256]);
    let bos_descriptor = BOS_DESCRIPTOR.init([0; 256]);
    let msos_descriptor = MSOS_DESCRIPTOR.init([0; 256]);
    let control_buf = CONTROL_BUF.init([0; 64]);

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        config_descriptor,
        bos_descriptor,
        msos_descriptor,
        control_buf,
    );

    let cdc_state = CDC_STATE.init(State::new());
    let serial = configure_usb_serial(&mut builder, cdc_state);

    let usb_device = builder.build();

    // On-board LED as heartbeat
    let led = Output::new(p.PIN_25, Level::Low);

    // Spawn tasks (unwrap the SpawnToken, then spawn)
    spawner.spawn(usb_task(usb_device).unwrap());
    spawner.spawn(serial_task(serial, frames).unwrap());
    spawner.spawn(control_task(surface, gateway, led).unwrap());

    info!("Eos bridge initialized, polling controls...");
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, Driver<'static, USB>>) {
    device.run().await;
}

/// Serial task - streams queued frames to the host.
#[embassy_executor::task]
async fn serial_task(
    mut class: CdcAcmClass<'static, Driver<'static, USB>>,
    frames: &'static FrameChannel,
) {
    forward_frames(&mut class, frames).await
}

/// Control task - polls every control on a fixed tick.
#[embassy_executor::task]
async fn control_task(mut surface: Surface, mut gateway: SerialGateway, mut led: Output<'static>) {
    commands::init_default_faders(&mut gateway);

    let mut ticker = Ticker::every(POLL_INTERVAL);
    let mut polls: u32 = 0;
    loop {
        surface.update(&mut gateway, Instant::now().as_millis());

        polls += 1;
        if polls == HEARTBEAT_POLLS {
            polls = 0;
            led.toggle();
        }
        ticker.next().await;
    }
}
