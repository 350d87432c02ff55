//! Bare-metal entry glue. The cartridge header and `crt0` that set up the
//! stacks and jump here come from the linker script of the ROM build.

use core::panic::PanicInfo;

use crate::console::Console;

unsafe extern "Rust" {
    unsafe fn main(console: &mut Console) -> !;
}

#[panic_handler]
fn panic(_panic: &PanicInfo<'_>) -> ! {
    loop {
        core::hint::spin_loop();
    }
}

#[unsafe(no_mangle)]
unsafe extern "C" fn __start() -> ! {
    let console = &mut unsafe { Console::new() };
    unsafe { main(console) }
}
