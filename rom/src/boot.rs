use core::panic::PanicInfo;

use crate::main;

#[panic_handler]
fn panic(_panic: &PanicInfo<'_>) -> ! {
    loop {}
}

unsafe extern "C" {
    unsafe static __data_load: u8;
    unsafe static mut __data_start: u8;
    unsafe static mut __data_end: u8;

    unsafe static mut __bss_start: u8;
    unsafe static mut __bss_end: u8;
}

// Cartridge entry. The header is left blank for the ROM fixer to fill in;
// this only sets up the IRQ and system mode stacks and jumps to __boot.
core::arch::global_asm!(
    ".section .text.crt0, \"ax\"",
    ".arm",
    ".global __start",
    "__start:",
    "    b 1f",
    "    .space 188",
    "1:",
    "    mov r0, #0x12",
    "    msr cpsr_c, r0",
    "    ldr sp, =0x03007FA0",
    "    mov r0, #0x1F",
    "    msr cpsr_c, r0",
    "    ldr sp, =0x03007F00",
    "    ldr r0, =__boot",
    "    bx r0",
    ".pool",
);

#[inline(always)]
unsafe fn init_data_and_bss() {
    unsafe {
        // Copy .data from ROM to IWRAM
        let mut src = &__data_load as *const u8;
        let mut dst = &raw mut __data_start as *mut u8;
        let end = &raw mut __data_end as *mut u8;
        while dst < end {
            dst.write_volatile(src.read_volatile());
            src = src.add(1);
            dst = dst.add(1);
        }

        // Zero .bss
        let mut bss = &raw mut __bss_start as *mut u8;
        let bss_end = &raw mut __bss_end as *mut u8;
        while bss < bss_end {
            bss.write_volatile(0);
            bss = bss.add(1);
        }
    }
}

#[unsafe(no_mangle)]
unsafe extern "C" fn __boot() -> ! {
    unsafe {
        init_data_and_bss();
    }
    main()
}
